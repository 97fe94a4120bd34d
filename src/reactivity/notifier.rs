// ============================================================================
// sublet - Notifier
// Trailing-edge, single-slot debounce in front of a change callback
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::core::options::{Callback, TrackOptions};
use crate::reactivity::timer::{Scheduler, TimerId};

// =============================================================================
// NOTIFIER
// =============================================================================

/// Coalesces change notifications into one delayed callback invocation.
///
/// Every [`notify`](Notifier::notify) records the view as the pending payload
/// and cancels-and-rearms the timer, so only the last view recorded before the
/// window closes is ever delivered. This is a debounce, not a queue.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
/// use sublet::{Notifier, TimerQueue, TrackOptions};
///
/// let queue = TimerQueue::new();
/// let seen = Rc::new(Cell::new(0));
///
/// let seen_clone = seen.clone();
/// let notifier = Notifier::<i32>::new(
///     Box::new(move |n: &i32| seen_clone.set(*n)),
///     &TrackOptions::default().with_scheduler(queue.clone()),
/// );
///
/// notifier.notify(1);
/// notifier.notify(2);
/// notifier.notify(3);
///
/// queue.advance(Duration::from_millis(1));
/// assert_eq!(seen.get(), 3);
/// ```
pub struct Notifier<V> {
    inner: Rc<NotifierInner<V>>,
}

struct NotifierInner<V> {
    callback: RefCell<Callback<V>>,
    pending: RefCell<Option<V>>,
    timer: Cell<Option<TimerId>>,
    scheduler: Rc<dyn Scheduler>,
    window: Duration,
}

impl<V: 'static> Notifier<V> {
    /// Bind a callback to the scheduler and window in `options`.
    pub fn new(callback: Callback<V>, options: &TrackOptions) -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                callback: RefCell::new(callback),
                pending: RefCell::new(None),
                timer: Cell::new(None),
                scheduler: options.resolve_scheduler(),
                window: options.window,
            }),
        }
    }

    /// Invoke the callback right now, bypassing the debounce.
    ///
    /// Used for the mount call.
    pub fn call(&self, view: &V) {
        (&mut *self.inner.callback.borrow_mut())(view);
    }

    /// Record `view` and (re)arm the delivery timer.
    pub fn notify(&self, view: V) {
        let inner = &self.inner;
        *inner.pending.borrow_mut() = Some(view);

        if let Some(id) = inner.timer.take() {
            inner.scheduler.cancel(id);
            trace!(timer = id.as_u64(), "delivery rearmed");
        }

        let target = inner.clone();
        let id = inner
            .scheduler
            .schedule(inner.window, Box::new(move || target.deliver()));
        inner.timer.set(Some(id));
        trace!(timer = id.as_u64(), "delivery armed");
    }

    /// True while a delivery is pending.
    pub fn is_armed(&self) -> bool {
        self.inner.timer.get().is_some()
    }

    /// The coalescing window.
    pub fn window(&self) -> Duration {
        self.inner.window
    }
}

impl<V> NotifierInner<V> {
    fn deliver(&self) {
        // Cleared first: a panicking callback must not leave a stale handle
        self.timer.set(None);
        let Some(view) = self.pending.borrow_mut().take() else {
            return;
        };
        trace!("delivering change");
        (&mut *self.callback.borrow_mut())(&view);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactivity::timer::TimerQueue;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn recording(queue: &TimerQueue) -> (Notifier<i32>, Rc<RefCell<Vec<i32>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let notifier = Notifier::<i32>::new(
            Box::new(move |n: &i32| seen_clone.borrow_mut().push(*n)),
            &TrackOptions::default().with_scheduler(queue.clone()),
        );
        (notifier, seen)
    }

    #[test]
    fn burst_delivers_last_payload_once() {
        let queue = TimerQueue::new();
        let (notifier, seen) = recording(&queue);

        for n in 1..=5 {
            notifier.notify(n);
        }

        assert!(notifier.is_armed());
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.advance(Duration::from_millis(1)), 1);
        assert_eq!(*seen.borrow(), vec![5]);
        assert!(!notifier.is_armed());
    }

    #[test]
    fn nothing_fires_before_the_window() {
        let queue = TimerQueue::new();
        let (notifier, seen) = recording(&queue);

        notifier.notify(1);
        queue.advance(Duration::from_micros(999));
        assert!(seen.borrow().is_empty());

        queue.advance(Duration::from_micros(1));
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn rearming_extends_the_window() {
        let queue = TimerQueue::new();
        let (notifier, seen) = recording(&queue);

        notifier.notify(1);
        queue.advance(Duration::from_micros(800));
        notifier.notify(2);
        queue.advance(Duration::from_micros(800));
        assert!(seen.borrow().is_empty());

        queue.advance(Duration::from_micros(200));
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn separate_windows_deliver_separately() {
        let queue = TimerQueue::new();
        let (notifier, seen) = recording(&queue);

        notifier.notify(1);
        queue.advance(Duration::from_millis(2));
        notifier.notify(2);
        queue.advance(Duration::from_millis(2));

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn mount_call_bypasses_the_timer() {
        let queue = TimerQueue::new();
        let (notifier, seen) = recording(&queue);

        notifier.call(&7);

        assert_eq!(*seen.borrow(), vec![7]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn custom_window_is_honored() {
        let queue = TimerQueue::new();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        let notifier = Notifier::<i32>::new(
            Box::new(move |n: &i32| seen_clone.set(*n)),
            &TrackOptions::default()
                .with_window(Duration::from_millis(16))
                .with_scheduler(queue.clone()),
        );

        notifier.notify(1);
        assert_eq!(notifier.window(), Duration::from_millis(16));
        queue.advance(Duration::from_millis(15));
        assert_eq!(seen.get(), 0);
        queue.advance(Duration::from_millis(1));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn unbounded_window_never_fires() {
        let queue = TimerQueue::new();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        let notifier = Notifier::<i32>::new(
            Box::new(move |n: &i32| seen_clone.set(*n)),
            &TrackOptions::default()
                .with_window(Duration::MAX)
                .with_scheduler(queue.clone()),
        );

        queue.advance(Duration::from_millis(5));
        notifier.notify(1);
        notifier.notify(2);

        assert!(notifier.is_armed());
        assert_eq!(queue.advance(Duration::from_secs(3600)), 0);
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn survives_a_panicking_callback() {
        let queue = TimerQueue::new();
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let notifier = Notifier::<i32>::new(
            Box::new(move |n: &i32| {
                calls_clone.set(calls_clone.get() + 1);
                if *n == 1 {
                    panic!("callback failed");
                }
            }),
            &TrackOptions::default().with_scheduler(queue.clone()),
        );

        notifier.notify(1);
        let result = catch_unwind(AssertUnwindSafe(|| queue.advance(Duration::from_millis(1))));
        assert!(result.is_err());
        assert!(!notifier.is_armed());

        notifier.notify(2);
        queue.advance(Duration::from_millis(1));
        assert_eq!(calls.get(), 2);
    }
}
