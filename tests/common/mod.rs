// Shared helpers for the strategy contract tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use sublet::Target;

/// Counts deliveries and keeps a snapshot of each one.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<Cell<u32>>,
    seen: Rc<RefCell<Vec<Value>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change callback feeding this recorder.
    pub fn hook<V: Target>(&self) -> impl FnMut(&V) + use<V> {
        let recorder = self.clone();
        move |view: &V| {
            recorder.calls.set(recorder.calls.get() + 1);
            recorder.seen.borrow_mut().push(view.snapshot());
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub fn last(&self) -> Value {
        self.seen.borrow().last().cloned().unwrap_or(Value::Null)
    }

    pub fn seen(&self) -> Vec<Value> {
        self.seen.borrow().clone()
    }
}

/// Let a few milliseconds pass on the host timer queue.
pub fn sleep(ms: u64) -> usize {
    sublet::advance(Duration::from_millis(ms))
}

/// Read an integer property.
pub fn int(view: &impl Target, key: &str) -> i64 {
    view.get(key).and_then(|v| v.as_i64()).unwrap_or_default()
}

/// Read a string property.
pub fn text(view: &impl Target, key: &str) -> String {
    view.get(key)
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Length of an array property.
pub fn array_len(view: &impl Target, key: &str) -> usize {
    view.get(key)
        .and_then(|v| v.as_array().map(Vec::len))
        .unwrap_or_default()
}
