// ============================================================================
// sublet - Timers
// Explicit schedule-after-delay / cancel facility
// ============================================================================
//
// Deliveries are deferred through a Scheduler owned by each notifier rather
// than through ambient global timer state. Two backends ship with the crate:
//
// - TimerQueue: a virtual clock advanced explicitly (deterministic, default)
// - TokioScheduler: real timers on a tokio LocalSet (feature "tokio")
// ============================================================================

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::core::constants::MAX_FLUSH_COUNT;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

// =============================================================================
// SCHEDULER TRAIT
// =============================================================================

/// The host timer facility.
pub trait Scheduler {
    /// Run `task` once, no earlier than `delay` from now.
    fn schedule(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled before.
    fn cancel(&self, id: TimerId) -> bool;
}

// =============================================================================
// TIMER QUEUE
// =============================================================================

#[derive(Default)]
struct QueueInner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), Task>,
    deadlines: HashMap<TimerId, Duration>,
}

/// A single-threaded timer queue on a virtual clock.
///
/// Time only moves when [`advance`](TimerQueue::advance) or
/// [`run_until_idle`](TimerQueue::run_until_idle) is called. Timers fire in
/// deadline order; timers with the same deadline fire in the order they were
/// scheduled. Cloning yields another handle to the same queue.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use sublet::TimerQueue;
///
/// let queue = TimerQueue::new();
/// let fired = Rc::new(Cell::new(false));
///
/// let fired_clone = fired.clone();
/// queue.schedule_fn(Duration::from_millis(10), move || fired_clone.set(true));
///
/// queue.advance(Duration::from_millis(9));
/// assert!(!fired.get());
///
/// queue.advance(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of timers armed and not yet fired.
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Schedule a closure without boxing it first.
    pub fn schedule_fn(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        self.schedule(delay, Box::new(task))
    }

    /// Remove the earliest timer due at or before `until`, moving the clock
    /// to its deadline.
    fn pop_due(&self, until: Option<Duration>) -> Option<(TimerId, Task)> {
        let mut inner = self.inner.borrow_mut();
        let &(deadline, id) = inner.timers.keys().next()?;
        if until.is_some_and(|until| deadline > until) {
            return None;
        }
        let task = inner.timers.remove(&(deadline, id))?;
        inner.deadlines.remove(&id);
        inner.now = inner.now.max(deadline);
        Some((id, task))
    }

    /// Let `elapsed` pass, firing every timer that falls due in order.
    ///
    /// Timers armed by a firing task are honored if they fall due before the
    /// end of the span. Returns the number of timers fired.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let until = self.now().saturating_add(elapsed);
        let mut fired = 0;

        // The borrow is released inside pop_due, so tasks may schedule/cancel
        while let Some((id, task)) = self.pop_due(Some(until)) {
            trace!(timer = id.as_u64(), "timer fired");
            task();
            fired += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(until);
        fired
    }

    /// Fire timers until none remain, jumping the clock forward as needed.
    ///
    /// # Panics
    ///
    /// Panics if more than `MAX_FLUSH_COUNT` timers fire, which happens when
    /// a callback re-arms its own timer on every delivery.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0u32;

        while let Some((id, task)) = self.pop_due(None) {
            fired += 1;
            if fired > MAX_FLUSH_COUNT {
                panic!(
                    "Maximum timer count exceeded. This can happen when a change \
                     callback writes a new value to the view it observes on every \
                     delivery."
                );
            }
            trace!(timer = id.as_u64(), "timer fired");
            task();
        }

        fired as usize
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = TimerId::new(inner.next_id);
        let deadline = inner.now.saturating_add(delay);
        inner.timers.insert((deadline, id), task);
        inner.deadlines.insert(id, deadline);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.deadlines.remove(&id) {
            Some(deadline) => inner.timers.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn log_into(log: Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> impl FnOnce() + 'static {
        move || log.borrow_mut().push(name)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let queue = TimerQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        queue.schedule_fn(Duration::from_millis(5), log_into(log.clone(), "late"));
        queue.schedule_fn(Duration::from_millis(1), log_into(log.clone(), "first"));
        queue.schedule_fn(Duration::from_millis(1), log_into(log.clone(), "second"));

        assert_eq!(queue.advance(Duration::from_millis(10)), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(queue.now(), Duration::from_millis(10));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let queue = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));

        let hits_clone = hits.clone();
        let id = queue.schedule_fn(Duration::from_millis(1), move || {
            hits_clone.set(hits_clone.get() + 1)
        });

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.advance(Duration::from_millis(5)), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn tasks_can_schedule_more_work() {
        let queue = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));

        let queue_clone = queue.clone();
        let hits_clone = hits.clone();
        queue.schedule_fn(Duration::from_millis(1), move || {
            hits_clone.set(hits_clone.get() + 1);
            let hits_inner = hits_clone.clone();
            queue_clone.schedule_fn(Duration::from_millis(1), move || {
                hits_inner.set(hits_inner.get() + 1)
            });
        });

        assert_eq!(queue.advance(Duration::from_millis(1)), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.advance(Duration::from_millis(1)), 1);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn run_until_idle_jumps_the_clock() {
        let queue = TimerQueue::new();
        queue.schedule_fn(Duration::from_secs(60), || {});

        assert_eq!(queue.run_until_idle(), 1);
        assert_eq!(queue.now(), Duration::from_secs(60));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn huge_delays_saturate_instead_of_overflowing() {
        let queue = TimerQueue::new();
        queue.advance(Duration::from_millis(1));
        queue.schedule_fn(Duration::MAX, || {});

        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.advance(Duration::MAX), 1);
        assert_eq!(queue.now(), Duration::MAX);
    }

    #[test]
    #[should_panic(expected = "Maximum timer count exceeded")]
    fn run_until_idle_detects_runaway_rescheduling() {
        fn rearm(queue: TimerQueue) {
            let next = queue.clone();
            queue.schedule_fn(Duration::from_millis(1), move || rearm(next));
        }

        let queue = TimerQueue::new();
        rearm(queue.clone());
        queue.run_until_idle();
    }
}
