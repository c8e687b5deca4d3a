// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side credential attempt limiting.
//!
//! A failed attempt increments a counter and stamps the time; reaching the
//! threshold sets a lock that auto-clears after the window. This guards the
//! UI flows only -- authoritative throttling must also exist server-side,
//! since a client-side lock is trivially bypassed outside this process.

use std::time::{Duration, Instant};

/// In-memory attempt counter with a fixed lockout window.
///
/// Held for the duration of a sign-in or sign-up flow; reset to zero on
/// success or once the lockout window elapses.
#[derive(Debug)]
pub struct AttemptCounter {
    max_attempts: u32,
    window: Duration,
    failed: u32,
    last_attempt_at: Option<Instant>,
    locked_until: Option<Instant>,
}

impl AttemptCounter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            failed: 0,
            last_attempt_at: None,
            locked_until: None,
        }
    }

    /// Check whether another attempt is allowed right now.
    ///
    /// Returns `Err(retry_after_secs)` while locked; an expired lock clears
    /// itself and the counter.
    pub fn check(&mut self) -> Result<(), u64> {
        self.check_at(Instant::now())
    }

    /// Record one failed attempt; sets the lock once the threshold is reached.
    pub fn record_failure(&mut self) {
        self.record_failure_at(Instant::now());
    }

    /// Reset the counter, e.g. after a successful attempt.
    pub fn reset(&mut self) {
        self.failed = 0;
        self.last_attempt_at = None;
        self.locked_until = None;
    }

    fn check_at(&mut self, now: Instant) -> Result<(), u64> {
        if let Some(until) = self.locked_until {
            if now < until {
                return Err((until - now).as_secs().max(1));
            }
            // Lock expired: forget the previous streak.
            self.reset();
        }
        Ok(())
    }

    fn record_failure_at(&mut self, now: Instant) {
        // Failures older than one window do not count toward the streak.
        if let Some(last) = self.last_attempt_at {
            if now.duration_since(last) > self.window {
                self.failed = 0;
            }
        }
        self.failed += 1;
        self.last_attempt_at = Some(now);
        if self.failed >= self.max_attempts {
            self.locked_until = Some(now + self.window);
        }
    }

    #[cfg(test)]
    fn failed(&self) -> u32 {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn allows_attempts_below_threshold() {
        let mut counter = AttemptCounter::new(5, WINDOW);
        let now = Instant::now();
        for _ in 0..4 {
            counter.record_failure_at(now);
            assert!(counter.check_at(now).is_ok());
        }
        assert_eq!(counter.failed(), 4);
    }

    #[test]
    fn locks_at_threshold() {
        let mut counter = AttemptCounter::new(5, WINDOW);
        let now = Instant::now();
        for _ in 0..5 {
            counter.record_failure_at(now);
        }
        let retry = counter.check_at(now).unwrap_err();
        assert!(retry >= 1 && retry <= 300, "got {retry}");
    }

    #[test]
    fn lock_auto_clears_after_window() {
        let mut counter = AttemptCounter::new(3, WINDOW);
        let now = Instant::now();
        for _ in 0..3 {
            counter.record_failure_at(now);
        }
        assert!(counter.check_at(now).is_err());

        let later = now + WINDOW + Duration::from_secs(1);
        assert!(counter.check_at(later).is_ok());
        assert_eq!(counter.failed(), 0, "streak forgotten with the lock");
    }

    #[test]
    fn stale_failures_do_not_accumulate() {
        let mut counter = AttemptCounter::new(3, WINDOW);
        let now = Instant::now();
        counter.record_failure_at(now);
        counter.record_failure_at(now);

        // A failure a window later starts a fresh streak.
        let later = now + WINDOW + Duration::from_secs(1);
        counter.record_failure_at(later);
        assert_eq!(counter.failed(), 1);
        assert!(counter.check_at(later).is_ok());
    }

    #[test]
    fn reset_clears_everything() {
        let mut counter = AttemptCounter::new(2, WINDOW);
        let now = Instant::now();
        counter.record_failure_at(now);
        counter.record_failure_at(now);
        assert!(counter.check_at(now).is_err());

        counter.reset();
        assert!(counter.check_at(now).is_ok());
    }
}
