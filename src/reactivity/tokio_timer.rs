// ============================================================================
// sublet - Tokio Scheduler
// Real timers for views living on a tokio LocalSet
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::reactivity::timer::{Scheduler, Task, TimerId};

#[derive(Default)]
struct TokioInner {
    next_id: u64,
    handles: HashMap<TimerId, JoinHandle<()>>,
}

/// Scheduler backed by `tokio::time::sleep` on the current `LocalSet`.
///
/// Each timer is a local task; cancelling aborts it. Must be used from
/// within [`tokio::task::LocalSet`] since views and callbacks are `!Send`.
#[derive(Clone, Default)]
pub struct TokioScheduler {
    inner: Rc<RefCell<TokioInner>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending(&self) -> usize {
        self.inner.borrow().handles.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            TimerId::new(inner.next_id)
        };

        let registry = Rc::downgrade(&self.inner);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().handles.remove(&id);
            }
            task();
        });

        self.inner.borrow_mut().handles.insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let handle = self.inner.borrow_mut().handles.remove(&id);
        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}
