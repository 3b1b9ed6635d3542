//! Deferred action scheduling.
//!
//! Scripted typing delays are cosmetic: the session runtime asks a
//! [`Scheduler`] to reveal messages later, and tests or dry runs can swap in
//! a scheduler that runs everything immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Action run once its delay has elapsed.
pub type ScheduledAction = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation handle for a scheduled action.
///
/// Clones share the same flags.
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle {
    cancelled: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevents the action from running if it has not run yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Marks the action as run. Called by schedulers.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// True while the action may still run.
    pub fn is_pending(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }
}

/// Runs actions after a delay.
pub trait Scheduler: Send + Sync {
    /// Schedules `action` to run once after `delay`.
    ///
    /// Implementations must not run the action after the returned handle
    /// has been cancelled, and must call [`ScheduleHandle::finish`] once the
    /// action has run.
    fn schedule_after(&self, delay: Duration, action: ScheduledAction) -> ScheduleHandle;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_clones_share_cancellation() {
        let handle = ScheduleHandle::new();
        let clone = handle.clone();

        assert!(!clone.is_cancelled());
        handle.cancel();
        assert!(clone.is_cancelled());
        assert!(!clone.is_pending());
    }

    #[test]
    fn test_finished_handle_is_no_longer_pending() {
        let handle = ScheduleHandle::new();
        assert!(handle.is_pending());

        handle.clone().finish();
        assert!(handle.is_finished());
        assert!(!handle.is_cancelled());
        assert!(!handle.is_pending());
    }
}
