//! Control signals for live-animated runs
//!
//! A running traversal suspends at defined micro-step boundaries by awaiting
//! [`RunControl::checkpoint`]. The checkpoint sleeps the configured per-step
//! delay in short poll slices, holding while `paused` is set and unwinding
//! with [`Cancelled`] as soon as cancellation is requested.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::{sleep, Instant};
use uuid::Uuid;

/// Identifier for a single run of an algorithm.
pub type RunId = Uuid;

/// Poll interval while waiting out the remainder of a step delay.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Poll interval while suspended on the pause flag.
const PAUSE_POLL: Duration = Duration::from_millis(100);

/// Distinguished cancellation signal.
///
/// Not an error: this unwinds an in-flight run between micro-steps so the
/// caller can report a "stopped" outcome. It must never be surfaced or
/// logged as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Externally settable signals bridging UI controls and an in-flight run.
///
/// Shared behind an `Arc`: the run polls the flags at every suspension
/// point while controls flip them from the outside.
#[derive(Debug)]
pub struct RunControl {
    paused: AtomicBool,
    cancelled: AtomicBool,
    step_delay_ms: AtomicU64,
}

impl RunControl {
    /// Create a control block with the given per-step delay.
    pub fn new(step_delay: Duration) -> Self {
        Self {
            paused: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            step_delay_ms: AtomicU64::new(step_delay.as_millis() as u64),
        }
    }

    /// Suspend the run at the next suspension point.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume a paused run.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Request cancellation; observed at the next suspension point.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Update the per-step delay; takes effect at the next suspension point.
    pub fn set_step_delay(&self, delay: Duration) {
        self.step_delay_ms
            .store(delay.as_millis() as u64, Ordering::Release);
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.load(Ordering::Acquire))
    }

    /// Suspension point between micro-steps.
    ///
    /// Sleeps the configured step delay in short slices. While `paused` is
    /// set the checkpoint holds indefinitely without making progress; when
    /// `cancelled` is set it returns `Err(Cancelled)` immediately, including
    /// while paused. The delay is sampled on entry, so a speed change is
    /// picked up at the following suspension point.
    pub async fn checkpoint(&self) -> Result<(), Cancelled> {
        let duration = self.step_delay();
        let start = Instant::now();
        loop {
            if self.is_cancelled() {
                return Err(Cancelled);
            }
            if self.is_paused() {
                sleep(PAUSE_POLL).await;
                continue;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return Ok(());
            }
            sleep((duration - elapsed).min(CANCEL_POLL)).await;
        }
    }
}
