//! Deferred actions polled from the UI frame loop
//!
//! Both timers are plain deadlines. The controller passes the current
//! `Instant` in on every poll, so nothing here spawns threads or sleeps.

use std::time::{Duration, Instant};
use tracing::debug;

/// Default silence timeout before the user is considered done speaking
pub const DEFAULT_SILENCE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Voice-activity silence timer
///
/// At most one deadline is pending. Arming again replaces it.
#[derive(Debug, Clone)]
pub struct SilenceTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl Default for SilenceTimer {
    fn default() -> Self {
        Self::new(DEFAULT_SILENCE_TIMEOUT)
    }
}

impl SilenceTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer from `now`
    pub fn arm(&mut self, now: Instant) {
        if self.deadline.is_some() {
            debug!("[TIMER] Silence timer re-armed");
        }
        self.deadline = Some(now + self.timeout);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Linear reconnection delay: `base * retry_count`
pub fn retry_delay(base: Duration, retry_count: u8) -> Duration {
    base * u32::from(retry_count)
}

/// One-shot delayed restart after a failed connection
#[derive(Debug, Clone, Default)]
pub struct RetryTimer {
    due: Option<Instant>,
}

impl RetryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.due
    }

    /// Returns true exactly once when the retry is due
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
