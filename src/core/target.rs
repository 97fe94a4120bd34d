// ============================================================================
// sublet - Target
// The interceptable container contract shared by State and Proxy
// ============================================================================

use serde_json::Value;

// =============================================================================
// KIND
// =============================================================================

/// Shape of the value held by a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    Null,
    Bool,
    Number,
    String,
}

impl Kind {
    /// Classify a dynamic value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
        }
    }

    /// Lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
        }
    }

    /// Objects and arrays can be tracked; scalars cannot.
    pub fn is_trackable(self) -> bool {
        matches!(self, Kind::Object | Kind::Array)
    }
}

// =============================================================================
// TARGET TRAIT
// =============================================================================

/// A mutable container that a strategy can wrap.
///
/// Implemented by [`State`](crate::State) and by [`Proxy`](crate::Proxy), so
/// proxies can wrap proxies. Property reads and writes go through `get`/`set`;
/// everything else (`modify`, `edit_array` and the array helpers built on it)
/// edits values in place and is never observed by a proxy's write path.
pub trait Target: Clone + 'static {
    /// Shape of the underlying value.
    fn kind(&self) -> Kind;

    /// Read a named property.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a named property.
    ///
    /// Returns false when the target cannot hold the property: scalars, and
    /// arrays given a key that is not a canonical index. Prefer
    /// [`set_index`](Target::set_index) for array elements.
    fn set(&self, key: &str, value: impl Into<Value>) -> bool;

    /// Own property names in insertion order (indices for arrays).
    fn keys(&self) -> Vec<String>;

    /// Materialize the current contents as a plain value.
    fn snapshot(&self) -> Value;

    /// Edit the value stored at `key` in place, without going through `set`.
    fn modify<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R>;

    /// Edit the elements of an array target in place.
    ///
    /// Returns None for non-array targets.
    fn edit_array<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Option<R>;

    /// Number of elements (arrays) or own properties (objects).
    fn len(&self) -> usize;

    /// Read an array element.
    fn index(&self, index: usize) -> Option<Value>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // =========================================================================
    // ARRAY HELPERS
    // =========================================================================

    /// Assign an array element, padding with nulls past the end.
    ///
    /// The gap is allocated eagerly: an index past what `Vec` can hold
    /// aborts with a capacity overflow, as `Vec::resize` does.
    fn set_index(&self, index: usize, value: impl Into<Value>) -> bool {
        let value = value.into();
        self.edit_array(|items| assign_index(items, index, value))
            .is_some()
    }

    /// Append an element, returning the new length.
    fn push(&self, value: impl Into<Value>) -> Option<usize> {
        let value = value.into();
        self.edit_array(|items| {
            items.push(value);
            items.len()
        })
    }

    /// Remove the last element.
    fn pop(&self) -> Option<Value> {
        self.edit_array(|items| items.pop()).flatten()
    }

    /// Remove the first element.
    fn shift(&self) -> Option<Value> {
        self.edit_array(|items| (!items.is_empty()).then(|| items.remove(0)))
            .flatten()
    }

    /// Prepend an element, returning the new length.
    fn unshift(&self, value: impl Into<Value>) -> Option<usize> {
        let value = value.into();
        self.edit_array(|items| {
            items.insert(0, value);
            items.len()
        })
    }

    /// Remove `delete_count` elements at `start` and insert `items` there.
    ///
    /// Out-of-range bounds are clamped. Returns the removed elements.
    fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = Value>,
    ) -> Option<Vec<Value>> {
        self.edit_array(|elements| {
            let start = start.min(elements.len());
            let end = start.saturating_add(delete_count).min(elements.len());
            elements.splice(start..end, items).collect()
        })
    }
}

pub(crate) fn assign_index(items: &mut Vec<Value>, index: usize, value: Value) {
    if index < items.len() {
        items[index] = value;
    } else {
        items.resize(index, Value::Null);
        items.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_match_error_wording() {
        assert_eq!(Kind::of(&json!(null)).name(), "null");
        assert_eq!(Kind::of(&json!(1)).name(), "number");
        assert_eq!(Kind::of(&json!("x")).name(), "string");
        assert_eq!(Kind::of(&json!(true)).name(), "boolean");
    }

    #[test]
    fn only_containers_are_trackable() {
        assert!(Kind::Object.is_trackable());
        assert!(Kind::Array.is_trackable());
        assert!(!Kind::Null.is_trackable());
        assert!(!Kind::Number.is_trackable());
    }
}
