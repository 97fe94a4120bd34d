// ============================================================================
// sublet - Host Context
// Thread-local host timer queue used when no scheduler is configured
// ============================================================================

use std::time::Duration;

use crate::reactivity::timer::TimerQueue;

thread_local! {
    /// The thread-local host timer queue
    static HOST: TimerQueue = TimerQueue::new();
}

/// Access the thread-local host timer queue.
pub fn with_host<R>(f: impl FnOnce(&TimerQueue) -> R) -> R {
    HOST.with(f)
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// A handle to this thread's host timer queue.
///
/// Views tracked without an explicit scheduler arm their timers here.
pub fn host() -> TimerQueue {
    with_host(TimerQueue::clone)
}

/// Let `elapsed` pass on the host queue, firing every timer that falls due.
///
/// Returns the number of timers fired.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sublet::{advance, proxy, State, Target};
/// use serde_json::json;
///
/// let view = proxy::track(State::new(json!({ "a": 1 })), |_| {}).unwrap();
/// view.set("a", 2);
///
/// assert_eq!(advance(Duration::from_millis(1)), 1);
/// ```
pub fn advance(elapsed: Duration) -> usize {
    host().advance(elapsed)
}

/// Fire host timers until none are pending, including timers armed by the
/// callbacks that run.
pub fn flush() -> usize {
    host().run_until_idle()
}
