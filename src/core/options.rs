// ============================================================================
// sublet - Track Options
// Per-view configuration: coalescing window and timer backend
// ============================================================================

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::reactivity::timer::Scheduler;

pub use super::constants::DEFAULT_WINDOW;

/// A change callback receiving the tracked view.
pub type Callback<V> = Box<dyn FnMut(&V)>;

/// Options for `track_with_options`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sublet::{TimerQueue, TrackOptions};
///
/// let queue = TimerQueue::new();
/// let options = TrackOptions::default()
///     .with_window(Duration::from_millis(16))
///     .with_scheduler(queue);
///
/// assert_eq!(options.window, Duration::from_millis(16));
/// ```
#[derive(Clone)]
pub struct TrackOptions {
    /// Coalescing window between the last write and the delivery
    pub window: Duration,

    /// Timer backend; None uses the thread-local host queue
    pub scheduler: Option<Rc<dyn Scheduler>>,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            scheduler: None,
        }
    }
}

impl TrackOptions {
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Rc::new(scheduler));
        self
    }

    /// The configured scheduler, falling back to the host queue.
    pub(crate) fn resolve_scheduler(&self) -> Rc<dyn Scheduler> {
        match &self.scheduler {
            Some(scheduler) => scheduler.clone(),
            None => Rc::new(crate::core::context::host()),
        }
    }
}

impl fmt::Debug for TrackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackOptions")
            .field("window", &self.window)
            .field("scheduler", &self.scheduler.as_ref().map(|_| "custom"))
            .finish()
    }
}
