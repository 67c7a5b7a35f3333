//! Cancellable delayed action: reset on every new call, fire once after a
//! quiet period.
//!
//! The debouncer holds no thread or timer of its own. The caller passes the
//! current instant to `schedule()` and `poll()`, typically from a UI tick.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Coalesces values scheduled within `delay` of each other into the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Returns the pending value once `now` has reached its deadline.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Returns the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drops the pending value. Returns `true` if something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}
