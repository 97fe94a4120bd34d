// ============================================================================
// sublet - State
// A shared, dynamically shaped object or array whose properties may carry
// accessor pairs
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::target::{assign_index, Kind, Target};

// =============================================================================
// ACCESSOR
// =============================================================================

/// A getter/setter pair installed on an object property.
///
/// Once installed, every read and write of that property on the owning
/// [`State`] is routed here instead of to a stored value.
pub(crate) trait Accessor {
    fn get(&self) -> Value;
    fn set(&self, value: Value);
    fn modify(&self, f: &mut dyn FnMut(&mut Value));
}

/// A single object property.
#[derive(Clone)]
pub(crate) enum Slot {
    Data(Value),
    Accessor(Rc<dyn Accessor>),
}

impl Slot {
    fn read(self) -> Value {
        match self {
            Slot::Data(value) => value,
            Slot::Accessor(accessor) => accessor.get(),
        }
    }
}

enum Shape {
    Object(IndexMap<String, Slot>),
    Array(Vec<Value>),
    Scalar(Value),
}

// =============================================================================
// STATE
// =============================================================================

/// A mutable state container shared between the consumer and a strategy.
///
/// Cloning a `State` yields another handle to the same storage, so a write
/// through one handle is visible through all of them.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sublet::{State, Target};
///
/// let state = State::new(json!({ "width": 1200 }));
/// let alias = state.clone();
///
/// alias.set("width", 1024);
/// assert_eq!(state.get("width"), Some(json!(1024)));
/// ```
#[derive(Clone)]
pub struct State {
    inner: Rc<RefCell<Shape>>,
}

impl State {
    /// Create a state from a dynamic value.
    ///
    /// Any value is accepted; scalars produce a state that can be read but
    /// not tracked.
    pub fn new(value: impl Into<Value>) -> Self {
        let shape = match value.into() {
            Value::Object(map) => Shape::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Slot::Data(value)))
                    .collect(),
            ),
            Value::Array(items) => Shape::Array(items),
            other => Shape::Scalar(other),
        };
        Self {
            inner: Rc::new(RefCell::new(shape)),
        }
    }

    /// Create an empty object state.
    pub fn object() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Create an empty array state.
    pub fn array() -> Self {
        Self::new(Value::Array(Vec::new()))
    }

    /// True if both handles point at the same storage.
    pub fn ptr_eq(a: &State, b: &State) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// A non-owning handle, for accessors stored inside this state.
    pub(crate) fn downgrade(&self) -> WeakState {
        WeakState {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub(crate) fn slot(&self, key: &str) -> Option<Slot> {
        match &*self.inner.borrow() {
            Shape::Object(props) => props.get(key).cloned(),
            _ => None,
        }
    }

    /// Replace a property with an accessor, returning what was there before.
    ///
    /// Returns None without installing anything if the state is not an object.
    pub(crate) fn define_accessor(
        &self,
        key: &str,
        accessor: Rc<dyn Accessor>,
    ) -> Option<Option<Slot>> {
        let mut shape = self.inner.borrow_mut();
        let Shape::Object(props) = &mut *shape else {
            return None;
        };
        Some(props.insert(key.to_owned(), Slot::Accessor(accessor)))
    }

    /// Write back an edited plain value, unless the slot became an accessor.
    fn store_data(&self, key: &str, value: Value) {
        if let Shape::Object(props) = &mut *self.inner.borrow_mut() {
            match props.get_mut(key) {
                Some(Slot::Accessor(_)) => {}
                Some(Slot::Data(current)) => *current = value,
                None => {
                    props.insert(key.to_owned(), Slot::Data(value));
                }
            }
        }
    }
}

/// Parse a canonical array index key ("0", "17", not "01" or "+1").
fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// Weak counterpart of [`State`].
pub(crate) struct WeakState {
    inner: Weak<RefCell<Shape>>,
}

impl WeakState {
    pub(crate) fn upgrade(&self) -> Option<State> {
        self.inner.upgrade().map(|inner| State { inner })
    }
}

impl Target for State {
    fn kind(&self) -> Kind {
        match &*self.inner.borrow() {
            Shape::Object(_) => Kind::Object,
            Shape::Array(_) => Kind::Array,
            Shape::Scalar(value) => Kind::of(value),
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        match self.slot(key) {
            Some(slot) => Some(slot.read()),
            None => array_index(key).and_then(|index| self.index(index)),
        }
    }

    /// On arrays only canonical index keys are accepted, and they behave like
    /// [`set_index`](Target::set_index).
    fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let accessor = {
            let mut shape = self.inner.borrow_mut();
            let props = match &mut *shape {
                Shape::Object(props) => props,
                Shape::Array(items) => {
                    let Some(index) = array_index(key) else {
                        return false;
                    };
                    assign_index(items, index, value);
                    return true;
                }
                Shape::Scalar(_) => return false,
            };
            match props.get_mut(key) {
                Some(Slot::Accessor(accessor)) => accessor.clone(),
                Some(Slot::Data(current)) => {
                    *current = value;
                    return true;
                }
                None => {
                    props.insert(key.to_owned(), Slot::Data(value));
                    return true;
                }
            }
        };
        // Borrow released: the setter may read this state again
        accessor.set(value);
        true
    }

    fn keys(&self) -> Vec<String> {
        match &*self.inner.borrow() {
            Shape::Object(props) => props.keys().cloned().collect(),
            Shape::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Shape::Scalar(_) => Vec::new(),
        }
    }

    fn snapshot(&self) -> Value {
        let slots: Vec<(String, Slot)> = match &*self.inner.borrow() {
            Shape::Object(props) => props
                .iter()
                .map(|(key, slot)| (key.clone(), slot.clone()))
                .collect(),
            Shape::Array(items) => return Value::Array(items.clone()),
            Shape::Scalar(value) => return value.clone(),
        };
        Value::Object(
            slots
                .into_iter()
                .map(|(key, slot)| (key, slot.read()))
                .collect(),
        )
    }

    fn modify<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let slot = self.slot(key)?;
        let accessor = match slot {
            Slot::Data(mut value) => {
                // Edit a copy with no borrow held: `f` may read this state
                let result = f(&mut value);
                self.store_data(key, value);
                return Some(result);
            }
            Slot::Accessor(accessor) => accessor,
        };

        let mut f = Some(f);
        let mut result = None;
        accessor.modify(&mut |value| {
            if let Some(f) = f.take() {
                result = Some(f(value));
            }
        });
        result
    }

    fn edit_array<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Option<R> {
        let mut items = match &*self.inner.borrow() {
            Shape::Array(items) => items.clone(),
            _ => return None,
        };
        let result = f(&mut items);
        if let Shape::Array(current) = &mut *self.inner.borrow_mut() {
            *current = items;
        }
        Some(result)
    }

    fn len(&self) -> usize {
        match &*self.inner.borrow() {
            Shape::Object(props) => props.len(),
            Shape::Array(items) => items.len(),
            Shape::Scalar(_) => 0,
        }
    }

    fn index(&self, index: usize) -> Option<Value> {
        match &*self.inner.borrow() {
            Shape::Array(items) => items.get(index).cloned(),
            _ => None,
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.snapshot()).finish()
    }
}

impl From<Value> for State {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
