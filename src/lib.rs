// ============================================================================
// sublet - Reactive State Binding
// ============================================================================
//
// Hand `track` a plain object and a callback; get back a view that calls the
// callback (debounced) whenever a tracked property changes. Two strategies:
//
// - proxy (default): a wrapper that observes every key, present or future
// - descriptor ("legacy" feature): accessors installed on the known keys
// ============================================================================

mod macros;

pub mod core;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::context::{advance, flush, host};
pub use crate::core::error::TrackError;
pub use crate::core::options::{Callback, TrackOptions, DEFAULT_WINDOW};
pub use crate::core::state::State;
pub use crate::core::target::{Kind, Target};

// Strategies
pub use primitives::proxy::Proxy;
pub use primitives::{descriptor, proxy};

// Timers
pub use reactivity::notifier::Notifier;
pub use reactivity::timer::{Scheduler, Task, TimerId, TimerQueue};
#[cfg(feature = "tokio")]
pub use reactivity::tokio_timer::TokioScheduler;

/// The strategy selected at build time: [`proxy::track`] by default.
#[cfg(not(feature = "legacy"))]
pub use primitives::proxy::track;

/// The strategy selected at build time: [`descriptor::track`] with the
/// `legacy` feature.
#[cfg(feature = "legacy")]
pub use primitives::descriptor::track;

// =============================================================================
// TESTS
// =============================================================================
