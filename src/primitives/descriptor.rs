// ============================================================================
// sublet - Descriptor Shim
// Tracks the keys an object has at creation time by replacing each one with
// an accessor pair backed by a hidden store
// ============================================================================
//
// The state is modified in place: the returned view is the same State handle
// that was passed in. Consequences worth knowing:
//
// - Keys added after tracking are plain properties and never notify
// - Writes through the original handle notify too (it IS the view)
// - Arrays get no accessors at all; only the mount call happens
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::core::error::TrackError;
use crate::core::options::{Callback, TrackOptions};
use crate::core::state::{Accessor, Slot, State, WeakState};
use crate::core::target::{Kind, Target};
use crate::reactivity::notifier::Notifier;

// =============================================================================
// SHIM
// =============================================================================

/// Per-`track` instance state: the hidden store and the notifier.
struct Shim {
    store: RefCell<HashMap<String, Value>>,
    notifier: Notifier<State>,
    view: WeakState,
}

/// The accessor pair installed on one key.
struct ShimAccessor {
    shim: Rc<Shim>,
    key: String,
    /// Accessor this one replaced, when the state was already tracked
    previous: Option<Rc<dyn Accessor>>,
}

impl Accessor for ShimAccessor {
    fn get(&self) -> Value {
        let store = self.shim.store.borrow();
        store.get(&self.key).cloned().unwrap_or(Value::Null)
    }

    fn set(&self, value: Value) {
        {
            let mut store = self.shim.store.borrow_mut();
            let current = store.entry(self.key.clone()).or_insert(Value::Null);
            if *current == value {
                return;
            }
            *current = value.clone();
        }

        if let Some(previous) = &self.previous {
            previous.set(value);
        }
        if let Some(view) = self.shim.view.upgrade() {
            self.shim.notifier.notify(view);
        }
    }

    fn modify(&self, f: &mut dyn FnMut(&mut Value)) {
        let mut updated = self.get();
        // No borrow held here: `f` may read the view
        f(&mut updated);
        self.shim
            .store
            .borrow_mut()
            .insert(self.key.clone(), updated.clone());

        // Keep earlier layers in sync without waking them
        if let Some(previous) = &self.previous {
            previous.modify(&mut |value| *value = updated.clone());
        }
    }
}

// =============================================================================
// TRACK
// =============================================================================

/// Track the keys `state` holds right now.
///
/// Calls `on_change` once before returning, then once per coalescing window
/// in which a tracked key changed. The returned view is `state` itself.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use serde_json::json;
/// use sublet::{descriptor, flush, State, Target};
///
/// let calls = Rc::new(Cell::new(0));
/// let calls_clone = calls.clone();
///
/// let state = State::new(json!({ "a": 1 }));
/// let view = descriptor::track(&state, move |_| calls_clone.set(calls_clone.get() + 1)).unwrap();
/// assert_eq!(calls.get(), 1);
///
/// view.set("a", 2);
/// view.set("late", true); // not tracked
/// flush();
/// assert_eq!(calls.get(), 2);
/// ```
pub fn track(
    state: &State,
    on_change: impl FnMut(&State) + 'static,
) -> Result<State, TrackError> {
    track_with_options(state, Some(Box::new(on_change)), TrackOptions::default())
}

/// Track with explicit options.
///
/// A missing callback is an error: the target is validated first, then
/// [`TrackError::InvalidCallback`] is returned.
pub fn track_with_options(
    state: &State,
    on_change: Option<Callback<State>>,
    options: TrackOptions,
) -> Result<State, TrackError> {
    let kind = state.kind();
    if !kind.is_trackable() {
        return Err(TrackError::InvalidTarget { found: kind.name() });
    }
    let on_change = on_change.ok_or(TrackError::InvalidCallback)?;

    let notifier = Notifier::new(on_change, &options);
    let view = state.clone();

    if kind == Kind::Array {
        debug!("descriptor shim: array target, no accessors installed");
        notifier.call(&view);
        return Ok(view);
    }

    let shim = Rc::new(Shim {
        store: RefCell::new(HashMap::new()),
        notifier,
        view: state.downgrade(),
    });

    let keys = state.keys();
    for key in &keys {
        let previous = match state.slot(key) {
            Some(Slot::Accessor(accessor)) => Some(accessor),
            _ => None,
        };
        let value = state.get(key).unwrap_or(Value::Null);
        shim.store.borrow_mut().insert(key.clone(), value);

        let accessor = Rc::new(ShimAccessor {
            shim: shim.clone(),
            key: key.clone(),
            previous,
        });
        state.define_accessor(key, accessor);
    }
    debug!(keys = keys.len(), "descriptor shim installed");

    shim.notifier.call(&view);
    Ok(view)
}

// =============================================================================
// TESTS
// =============================================================================
