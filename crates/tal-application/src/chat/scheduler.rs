//! Scheduler implementations.

use std::time::Duration;
use tal_core::scheduler::{ScheduleHandle, ScheduledAction, Scheduler};
use tokio_util::sync::CancellationToken;

/// Runs actions on the tokio runtime after a real delay.
///
/// Cancelling the scheduler's token drops every action that has not run yet.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    token: CancellationToken,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_all(&self) {
        self.token.cancel();
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, action: ScheduledAction) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let guard = handle.clone();
        let token = self.token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !guard.is_cancelled() {
                        action();
                        guard.finish();
                    }
                }
            }
        });

        handle
    }
}

/// Runs every action synchronously, ignoring delays.
///
/// Used for dry runs and tests where typing delays only slow things down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule_after(&self, _delay: Duration, action: ScheduledAction) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        action();
        handle.finish();
        handle
    }
}
