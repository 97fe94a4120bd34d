// ============================================================================
// sublet - Transparent Proxy
// Wraps a target and observes every property write routed through it,
// including writes to keys that did not exist at creation time
// ============================================================================

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::core::error::TrackError;
use crate::core::options::{Callback, TrackOptions};
use crate::core::target::{Kind, Target};
use crate::reactivity::notifier::Notifier;

// =============================================================================
// PROXY
// =============================================================================

/// A tracked view that forwards to its target.
///
/// Reads always forward, so the proxy and its target agree on every key at
/// every instant. A `set` that changes a value is written to the target and
/// schedules a delivery. In-place edits (`modify`, `edit_array` and the array
/// helpers) forward silently. Writes made directly on the target bypass the
/// proxy and are not observed.
///
/// Cloning a proxy yields another handle to the same view.
pub struct Proxy<T: Target> {
    inner: Rc<ProxyInner<T>>,
}

struct ProxyInner<T: Target> {
    target: T,
    notifier: Notifier<Proxy<T>>,
}

impl<T: Target> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Target> Proxy<T> {
    /// The wrapped target.
    pub fn target(&self) -> &T {
        &self.inner.target
    }

    /// True if both handles are the same view.
    pub fn ptr_eq(a: &Proxy<T>, b: &Proxy<T>) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T: Target> Target for Proxy<T> {
    fn kind(&self) -> Kind {
        self.inner.target.kind()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.inner.target.get(key)
    }

    /// Always acknowledged, whether or not the value changed.
    ///
    /// Index writes on an array target are stored but, like every other
    /// element edit, never notify.
    fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let target = &self.inner.target;
        if target.get(key).as_ref() != Some(&value)
            && target.set(key, value)
            && target.kind() != Kind::Array
        {
            self.inner.notifier.notify(self.clone());
        }
        true
    }

    fn keys(&self) -> Vec<String> {
        self.inner.target.keys()
    }

    fn snapshot(&self) -> Value {
        self.inner.target.snapshot()
    }

    fn modify<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        self.inner.target.modify(key, f)
    }

    fn edit_array<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> Option<R> {
        self.inner.target.edit_array(f)
    }

    fn len(&self) -> usize {
        self.inner.target.len()
    }

    fn index(&self, index: usize) -> Option<Value> {
        self.inner.target.index(index)
    }
}

impl<T: Target> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Proxy").field(&self.snapshot()).finish()
    }
}

// =============================================================================
// TRACK
// =============================================================================

/// Wrap `target` in a tracked proxy.
///
/// Calls `on_change` once with the proxy before returning, then once per
/// coalescing window in which a write through the proxy changed a value.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use serde_json::json;
/// use sublet::{flush, proxy, State, Target};
///
/// let calls = Rc::new(Cell::new(0));
/// let calls_clone = calls.clone();
///
/// let state = State::new(json!({ "a": 1 }));
/// let view = proxy::track(state.clone(), move |_| calls_clone.set(calls_clone.get() + 1)).unwrap();
///
/// view.set("late", true); // new keys are observed
/// flush();
/// assert_eq!(calls.get(), 2);
///
/// state.set("a", 5); // bypasses the proxy
/// flush();
/// assert_eq!(calls.get(), 2);
/// assert_eq!(view.get("a"), Some(json!(5)));
/// ```
pub fn track<T, F>(target: T, on_change: F) -> Result<Proxy<T>, TrackError>
where
    T: Target,
    F: FnMut(&Proxy<T>) + 'static,
{
    track_with_options(target, Some(Box::new(on_change)), TrackOptions::default())
}

/// Wrap with explicit options.
///
/// A missing callback is replaced by a no-op.
pub fn track_with_options<T: Target>(
    target: T,
    on_change: Option<Callback<Proxy<T>>>,
    options: TrackOptions,
) -> Result<Proxy<T>, TrackError> {
    let kind = target.kind();
    if !kind.is_trackable() {
        return Err(TrackError::InvalidTarget { found: kind.name() });
    }
    let on_change: Callback<Proxy<T>> = match on_change {
        Some(on_change) => on_change,
        None => Box::new(|_: &Proxy<T>| {}),
    };

    let proxy = Proxy {
        inner: Rc::new(ProxyInner {
            target,
            notifier: Notifier::new(on_change, &options),
        }),
    };
    debug!(kind = kind.name(), "proxy installed");

    proxy.inner.notifier.call(&proxy);
    Ok(proxy)
}

// =============================================================================
// TESTS
// =============================================================================
