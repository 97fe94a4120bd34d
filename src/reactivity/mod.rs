// ============================================================================
// sublet - Reactivity Module
// Debounced delivery and the timer facility behind it
// ============================================================================

pub mod notifier;
pub mod timer;
#[cfg(feature = "tokio")]
pub mod tokio_timer;

// Re-export main items
pub use notifier::Notifier;
pub use timer::{Scheduler, Task, TimerId, TimerQueue};
#[cfg(feature = "tokio")]
pub use tokio_timer::TokioScheduler;
