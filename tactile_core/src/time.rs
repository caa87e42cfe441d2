// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Game-time helpers.
//!
//! Tactile never reads a wall clock. The host passes its monotonic game time,
//! in milliseconds, into every operation that records or compares timestamps.

/// Returns true if `since` lies less than `window` milliseconds before `now`.
#[inline]
pub fn within(now: f64, since: f64, window: f64) -> bool {
    now - since < window
}

/// A single deadline on the game clock.
///
/// Scheduling replaces any pending deadline. [`OneShot::poll`] reports the
/// deadline exactly once, the first time it is polled at or after the due time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OneShot {
    due: Option<f64>,
}

impl OneShot {
    /// Create an idle timer.
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Schedule the timer `delay` milliseconds after `now`.
    pub fn schedule(&mut self, now: f64, delay: f64) {
        self.due = Some(now + delay);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Returns true while a deadline is scheduled and has not fired.
    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Game time at which the pending deadline fires.
    pub fn due(&self) -> Option<f64> {
        self.due
    }

    /// Fire the timer if its deadline has passed.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_is_exclusive_at_the_window_edge() {
        assert!(within(1049.0, 1000.0, 50.0));
        assert!(!within(1050.0, 1000.0, 50.0));
    }

    #[test]
    fn one_shot_fires_once() {
        let mut t = OneShot::new();
        assert!(!t.poll(0.0));
        t.schedule(100.0, 40.0);
        assert!(t.is_pending());
        assert!(!t.poll(139.0));
        assert!(t.poll(140.0));
        assert!(!t.poll(200.0));
        assert!(!t.is_pending());
    }

    #[test]
    fn reschedule_replaces_deadline() {
        let mut t = OneShot::new();
        t.schedule(0.0, 10.0);
        t.schedule(5.0, 10.0);
        assert!(!t.poll(10.0));
        assert!(t.poll(15.0));
        t.schedule(0.0, 10.0);
        t.cancel();
        assert!(!t.poll(100.0));
    }
}
