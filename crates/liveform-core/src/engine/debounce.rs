//! Re-arm-on-change debounce timer
//!
//! Each debounced check owns one of these. Every relevant field edit
//! calls `arm()`, pushing the deadline out to now + quiescence period;
//! the check fires only when the deadline is reached with no newer edit.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// A single debounce timer
#[derive(Debug)]
pub(crate) struct Debounce {
    /// Quiescence period
    delay: Duration,
    /// Pending deadline, if armed
    deadline: Option<Instant>,
}

impl Debounce {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule (or reschedule) the timer for now + delay
    pub(crate) fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Cancel the pending deadline
    pub(crate) fn disarm(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Wait until the armed deadline
    ///
    /// Pends forever when disarmed; callers guard with `is_armed()` in
    /// their `select!` branch anyway.
    pub(crate) async fn elapsed(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_quiescence() {
        let mut debounce = Debounce::new(Duration::from_millis(200));
        debounce.arm();

        let started = Instant::now();
        debounce.elapsed().await;
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_pushes_deadline_out() {
        let mut debounce = Debounce::new(Duration::from_millis(200));
        debounce.arm();

        tokio::time::advance(Duration::from_millis(150)).await;
        debounce.arm();

        let started = Instant::now();
        debounce.elapsed().await;
        // Full period from the re-arm, not the original arm
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_pends() {
        let debounce = Debounce::new(Duration::from_millis(200));
        assert!(!debounce.is_armed());

        let wait = tokio::time::timeout(Duration::from_secs(1), debounce.elapsed()).await;
        assert!(wait.is_err());
    }
}
