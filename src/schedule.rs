//! Host-driven timers with explicit cancellation.
//!
//! The component never owns a clock. The host calls `MapCore::advance` with
//! its current time (milliseconds) from its animation scheduler, and each
//! component polls the timers it registered. Every timer hands out a
//! [`TaskHandle`]; cancelling the handle (or disposing the owner) stops the
//! timer for good.

use std::cell::Cell;
use std::rc::Rc;

/// Cancellation token shared between a timer and whoever registered it.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// A recurring timer.
#[derive(Debug)]
pub struct Interval {
    period_ms: f64,
    next_due_ms: f64,
    handle: TaskHandle,
}

impl Interval {
    /// First fires at `start_ms + period_ms`.
    #[must_use]
    pub fn new(start_ms: f64, period_ms: f64) -> Self {
        Self { period_ms, next_due_ms: start_ms + period_ms, handle: TaskHandle::new() }
    }

    #[must_use]
    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn next_due_ms(&self) -> f64 {
        self.next_due_ms
    }

    /// Fire at most once if due, then re-arm one period after `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.handle.is_cancelled() || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms + self.period_ms;
        true
    }
}

/// A one-shot timer.
#[derive(Debug)]
pub struct Timeout {
    due_ms: f64,
    fired: bool,
    handle: TaskHandle,
}

impl Timeout {
    #[must_use]
    pub fn new(due_ms: f64) -> Self {
        Self { due_ms, fired: false, handle: TaskHandle::new() }
    }

    #[must_use]
    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    /// True exactly once, on the first poll at or after the due time.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.fired || self.handle.is_cancelled() || now_ms < self.due_ms {
            return false;
        }
        self.fired = true;
        true
    }

    /// Fired or cancelled; nothing left to do.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.fired || self.handle.is_cancelled()
    }
}
