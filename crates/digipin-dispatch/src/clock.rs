//! Time source for pacing runs and stamping log lines
//!
//! Runs never touch the wall clock directly. Production uses [`SystemClock`];
//! tests use [`InstantClock`] to run at full speed or [`ManualClock`] to
//! release each delay by hand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Delays and time-of-day labels for a run
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend for `duration`
    ///
    /// Must be cancel-safe: dropping the future abandons the delay with no
    /// side effects.
    async fn sleep(&self, duration: Duration);

    /// Time-of-day label for a log line
    fn timestamp(&self) -> String;
}

/// Real-time clock: tokio timers and local time labels
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn timestamp(&self) -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

/// Clock whose delays complete immediately
#[derive(Debug, Clone)]
pub struct InstantClock {
    label: String,
}

impl InstantClock {
    pub fn new() -> Self {
        Self::with_label("00:00:00")
    }

    /// Use a fixed timestamp label for every log line
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }

    fn timestamp(&self) -> String {
        self.label.clone()
    }
}

/// Clock whose delays complete only when [`advance`](ManualClock::advance)d
///
/// Each `advance` releases one delay, either one already waiting or the next
/// one to start. Tracks how many delays were started and how many are still
/// waiting, so tests can check that a cancelled run leaves no timers behind.
#[derive(Debug)]
pub struct ManualClock {
    releases: Semaphore,
    started: AtomicUsize,
    pending: AtomicUsize,
    requested: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            releases: Semaphore::new(0),
            started: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Release one delay
    pub fn advance(&self) {
        self.releases.add_permits(1);
    }

    /// Number of delays ever started
    pub fn sleeps_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of delays currently waiting
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Durations of every delay started so far
    pub fn requested(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the pending count when a delay finishes or is dropped
struct PendingGuard<'a>(&'a AtomicUsize);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.started.fetch_add(1, Ordering::SeqCst);
        self.pending.fetch_add(1, Ordering::SeqCst);
        let _guard = PendingGuard(&self.pending);

        if let Ok(permit) = self.releases.acquire().await {
            permit.forget();
        }
    }

    fn timestamp(&self) -> String {
        format!("T+{:02}", self.started.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_instant_clock_does_not_wait() {
        let clock = InstantClock::with_label("09:15:00");
        tokio::time::timeout(Duration::from_millis(100), clock.sleep(Duration::from_secs(3600)))
            .await
            .unwrap();
        assert_eq!(clock.timestamp(), "09:15:00");
    }

    #[tokio::test]
    async fn test_manual_clock_waits_for_advance() {
        let clock = Arc::new(ManualClock::new());
        let sleeper = {
            let clock = clock.clone();
            tokio::spawn(async move { clock.sleep(Duration::from_millis(1500)).await })
        };

        tokio::task::yield_now().await;
        while clock.pending() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(!sleeper.is_finished());

        clock.advance();
        sleeper.await.unwrap();

        assert_eq!(clock.sleeps_started(), 1);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.requested(), vec![Duration::from_millis(1500)]);
    }

    #[tokio::test]
    async fn test_manual_clock_dropped_sleep_is_not_pending() {
        let clock = ManualClock::new();
        let result = tokio::time::timeout(Duration::from_millis(10), clock.sleep(Duration::ZERO)).await;

        assert!(result.is_err());
        assert_eq!(clock.sleeps_started(), 1);
        assert_eq!(clock.pending(), 0);
    }

    #[tokio::test]
    async fn test_advance_before_sleep_is_banked() {
        let clock = ManualClock::new();
        clock.advance();
        tokio::time::timeout(Duration::from_millis(100), clock.sleep(Duration::from_secs(2)))
            .await
            .unwrap();
    }

    #[test]
    fn test_system_clock_label_shape() {
        let label = SystemClock.timestamp();
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
        assert_eq!(label.as_bytes()[5], b':');
    }
}
