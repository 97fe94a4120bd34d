// ============================================================================
// sublet - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// This reduces the boilerplate of manually cloning `Rc` handles before
/// moving them into a change callback.
///
/// # Usage
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use serde_json::json;
/// use sublet::{cloned, proxy, State};
///
/// let renders = Rc::new(Cell::new(0));
///
/// let _view = proxy::track(
///     State::new(json!({ "a": 1 })),
///     cloned!(renders => move |_| renders.set(renders.get() + 1)),
/// );
/// assert_eq!(renders.get(), 1);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Track a state with the build-selected strategy, capturing clones of the
/// listed variables in the callback.
///
/// Wraps `track(state, cloned!(... => move |view| ...))`.
///
/// # Usage
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use serde_json::json;
/// use sublet::{track, State};
///
/// let renders = Rc::new(Cell::new(0));
/// let state = State::new(json!({ "a": 1 }));
///
/// # #[cfg(not(feature = "legacy"))]
/// let _view = track!(state.clone(), renders => |_view| renders.set(renders.get() + 1));
/// # #[cfg(feature = "legacy")]
/// # let _view = track!(&state, renders => |_view| renders.set(renders.get() + 1));
/// assert_eq!(renders.get(), 1);
/// ```
#[macro_export]
macro_rules! track {
    // Case 1: With captured variables
    ($state:expr, $($deps:ident),+ => |$view:pat_param| $body:expr) => {
        $crate::track($state, $crate::cloned!($($deps),+ => move |$view| $body))
    };
    // Case 2: Plain callback
    ($state:expr, $callback:expr) => {
        $crate::track($state, $callback)
    };
}
