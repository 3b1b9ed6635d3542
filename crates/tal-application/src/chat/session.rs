//! Chat session runtime.
//!
//! `ChatSession` wraps one visitor's `SessionState` and drives it with the
//! dialogue engine. It owns everything time-related: typing delays are
//! turned into scheduled reveals, and the lead submission is spawned on the
//! tokio runtime and reported back to the engine when it finishes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tal_core::dialogue::{DialogueEngine, StepOutcome, Transition};
use tal_core::error::{Result, TalError};
use tal_core::lead::{LeadGateway, LeadRecord, PageContext};
use tal_core::scheduler::{ScheduleHandle, Scheduler};
use tal_core::session::{MessageSender, SessionState, SessionView};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Callback invoked with a fresh view after every state change.
pub type StateListener = Arc<dyn Fn(&SessionView) + Send + Sync>;

/// Reveal bookkeeping: when the next message may appear and which timers
/// are still outstanding.
#[derive(Default)]
struct RevealQueue {
    available_at: Option<Instant>,
    handles: Vec<ScheduleHandle>,
}

struct Inner {
    state: Mutex<SessionState>,
    engine: DialogueEngine,
    scheduler: Arc<dyn Scheduler>,
    gateway: Arc<dyn LeadGateway>,
    listeners: Mutex<Vec<StateListener>>,
    reveals: Mutex<RevealQueue>,
    submission: Mutex<Option<JoinHandle<()>>>,
    shutdown: CancellationToken,
}

/// A running conversation with one visitor.
///
/// Cloning is cheap; clones drive the same session.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

impl ChatSession {
    /// Creates a session for the engine's script. Call [`start`](Self::start)
    /// to show the opening lines.
    pub fn new(
        engine: DialogueEngine,
        context: PageContext,
        scheduler: Arc<dyn Scheduler>,
        gateway: Arc<dyn LeadGateway>,
    ) -> Self {
        let state = SessionState::new(engine.script().id(), context);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                engine,
                scheduler,
                gateway,
                listeners: Mutex::new(Vec::new()),
                reveals: Mutex::new(RevealQueue::default()),
                submission: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn id(&self) -> String {
        self.lock_state().map(|s| s.id.clone()).unwrap_or_default()
    }

    /// Registers a listener for state changes.
    pub fn subscribe(&self, listener: StateListener) {
        if let Ok(mut listeners) = self.inner.listeners.lock() {
            listeners.push(listener);
        }
    }

    pub fn start(&self) -> Result<StepOutcome> {
        self.apply(|engine, state| engine.start(state))
    }

    /// Answers the current step with free text.
    ///
    /// # Panics
    ///
    /// Reaching the terminal step spawns the submission with `tokio::spawn`,
    /// which panics when called outside a tokio runtime.
    pub fn submit_response(&self, raw: &str) -> Result<StepOutcome> {
        self.apply(|engine, state| engine.submit_response(state, raw))
    }

    /// Picks an option on the current choice step.
    ///
    /// # Panics
    ///
    /// Same as [`submit_response`](Self::submit_response) when the choice
    /// completes the dialogue outside a tokio runtime.
    pub fn select_option(&self, key: &str) -> Result<StepOutcome> {
        self.apply(|engine, state| engine.select_option(state, key))
    }

    /// Current renderer view.
    pub fn view(&self) -> Result<SessionView> {
        Ok(self.lock_state()?.view())
    }

    /// Full copy of the session state.
    pub fn snapshot(&self) -> Result<SessionState> {
        Ok(self.lock_state()?.clone())
    }

    /// Waits for an in-flight submission to be reported back.
    pub async fn settle(&self) {
        let handle = self
            .inner
            .submission
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("[ChatSession] Submission task failed: {}", e);
            }
        }
    }

    /// Tears the session down: pending reveals are cancelled and a late
    /// submission result is discarded.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        if let Ok(mut reveals) = self.inner.reveals.lock() {
            for handle in reveals.handles.drain(..) {
                handle.cancel();
            }
        }
        tracing::debug!("[ChatSession] Session {} shut down", self.id());
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.inner
            .state
            .lock()
            .map_err(|_| TalError::internal("session state lock poisoned"))
    }

    fn apply<F>(&self, operation: F) -> Result<StepOutcome>
    where
        F: FnOnce(&DialogueEngine, &mut SessionState) -> Result<Transition>,
    {
        if self.is_shut_down() {
            return Err(TalError::invalid_state("session has been shut down"));
        }

        let (transition, delays) = {
            let mut state = self.lock_state()?;
            let transition = operation(&self.inner.engine, &mut state)?;
            let delays: Vec<(String, u64)> = transition
                .appended
                .iter()
                .filter_map(|id| {
                    state
                        .log
                        .entries()
                        .iter()
                        .find(|m| &m.id == id)
                        .map(|m| (m.id.clone(), m.typing_delay_ms))
                })
                .collect();
            Self::refresh_typing(&mut state);
            (transition, delays)
        };

        self.notify();
        self.schedule_reveals(delays);

        if let Some(record) = transition.submission {
            self.spawn_submission(record);
        }

        Ok(transition.outcome)
    }

    /// Schedules each message to appear after its delay, queued behind any
    /// reveal that is still pending.
    ///
    /// Deadlines are reserved under the queue lock, but the scheduler is
    /// called with the lock released: an immediate scheduler runs the reveal
    /// and the listeners inline, and listeners may drive the session.
    fn schedule_reveals(&self, delays: Vec<(String, u64)>) {
        if delays.is_empty() {
            return;
        }

        let now = Instant::now();
        let deadlines: Vec<(String, Duration)> = {
            let Ok(mut reveals) = self.inner.reveals.lock() else {
                return;
            };
            let mut reserved = Vec::with_capacity(delays.len());
            for (message_id, delay_ms) in delays {
                let start = reveals.available_at.map_or(now, |at| at.max(now));
                let deadline = start + Duration::from_millis(delay_ms);
                reveals.available_at = Some(deadline);
                reserved.push((message_id, deadline.saturating_duration_since(now)));
            }
            reserved
        };

        let handles: Vec<ScheduleHandle> = deadlines
            .into_iter()
            .map(|(message_id, delay)| {
                let session = self.clone();
                self.inner
                    .scheduler
                    .schedule_after(delay, Box::new(move || session.reveal(&message_id)))
            })
            .collect();

        let Ok(mut reveals) = self.inner.reveals.lock() else {
            return;
        };
        reveals.handles.retain(ScheduleHandle::is_pending);
        for handle in handles {
            if self.is_shut_down() {
                handle.cancel();
            } else if handle.is_pending() {
                reveals.handles.push(handle);
            }
        }
    }

    fn reveal(&self, message_id: &str) {
        if self.is_shut_down() {
            return;
        }
        let changed = match self.lock_state() {
            Ok(mut state) => {
                let changed = state.log.reveal_through(message_id);
                Self::refresh_typing(&mut state);
                changed
            }
            Err(_) => false,
        };
        if changed {
            self.notify();
        }
    }

    /// Tal is "typing" while any of its messages waits for its delay.
    fn refresh_typing(state: &mut SessionState) {
        state.typing = state
            .log
            .pending()
            .iter()
            .any(|m| m.sender == MessageSender::Agent);
    }

    fn spawn_submission(&self, record: LeadRecord) {
        let session = self.clone();
        let gateway = Arc::clone(&self.inner.gateway);
        let token = self.inner.shutdown.clone();

        tracing::info!(
            "[ChatSession] Submitting lead {} ({:?})",
            record.id,
            record.intake
        );

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("[ChatSession] Session closed, dropping submission {}", record.id);
                    return;
                }
                outcome = gateway.submit(&record) => outcome,
            };

            if let Err(e) = &outcome {
                tracing::warn!("[ChatSession] Lead {} was not accepted: {}", record.id, e);
            }
            if session.is_shut_down() {
                tracing::debug!("[ChatSession] Session closed, ignoring submission result");
                return;
            }
            let reported = session.apply(|engine, state| {
                engine
                    .complete_submission(state, &outcome)
                    .ok_or_else(|| TalError::invalid_state("no submission in flight"))
            });
            if let Err(e) = reported {
                tracing::debug!("[ChatSession] Submission report ignored: {}", e);
            }
        });

        if let Ok(mut slot) = self.inner.submission.lock() {
            *slot = Some(handle);
        }
    }

    fn notify(&self) {
        let listeners = match self.inner.listeners.lock() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return,
        };
        if listeners.is_empty() {
            return;
        }
        let Ok(view) = self.view() else {
            return;
        };
        for listener in &listeners {
            listener(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ImmediateScheduler;
    use crate::chat::TokioScheduler;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tal_core::config::BrandConfig;
    use tal_core::dialogue::preset::{chat_onboarding, interactive_phone};
    use tal_core::field::FieldName;
    use tal_core::lead::{SubmissionReceipt, SubmissionStatus};

    #[derive(Default)]
    struct RecordingGateway {
        calls: AtomicUsize,
        records: Mutex<Vec<LeadRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl LeadGateway for RecordingGateway {
        async fn submit(&self, record: &LeadRecord) -> Result<SubmissionReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.lock().unwrap().push(record.clone());
            if self.fail {
                Err(TalError::submission("intake returned 503"))
            } else {
                Ok(SubmissionReceipt::default())
            }
        }
    }

    fn session_with(
        script: tal_core::dialogue::DialogueScript,
        scheduler: Arc<dyn Scheduler>,
        gateway: Arc<RecordingGateway>,
    ) -> ChatSession {
        let engine = DialogueEngine::new(Arc::new(script), Arc::new(BrandConfig::default()));
        ChatSession::new(
            engine,
            PageContext::from_url("https://tal.example/acme?utm_source=li"),
            scheduler,
            gateway,
        )
    }

    fn onboarding(gateway: Arc<RecordingGateway>) -> ChatSession {
        session_with(chat_onboarding(), Arc::new(ImmediateScheduler), gateway)
    }

    /// Runs `operation` on its own thread, failing if it has not returned in time.
    fn returns_in_time<T: Send + 'static>(operation: impl FnOnce() -> T + Send + 'static) -> T {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(operation());
        });
        rx.recv_timeout(Duration::from_secs(5))
            .expect("session operation did not return")
    }

    #[tokio::test]
    async fn test_end_to_end_submits_once() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = onboarding(gateway.clone());

        session.start().unwrap();
        session.submit_response("Asha").unwrap();
        session.submit_response("9876543210").unwrap();
        session.submit_response("Acme").unwrap();
        session.settle().await;

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        let record = gateway.records.lock().unwrap()[0].clone();
        assert_eq!(record.fields.get(FieldName::Name), Some("Asha"));
        assert_eq!(record.fields.get(FieldName::Phone), Some("9876543210"));
        assert_eq!(record.fields.get(FieldName::Workplace), Some("Acme"));
        assert_eq!(record.utm_raw, "?utm_source=li");

        let view = session.view().unwrap();
        assert_eq!(view.submission, SubmissionStatus::Succeeded);
        assert_eq!(view.pending, 0);
        assert!(!view.typing);
    }

    #[tokio::test]
    async fn test_replay_after_terminal_does_not_resubmit() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = onboarding(gateway.clone());
        session.start().unwrap();
        for input in ["Asha", "9876543210", "Acme"] {
            session.submit_response(input).unwrap();
        }
        session.settle().await;
        let fields = session.snapshot().unwrap().fields;

        let outcome = session.submit_response("Acme").unwrap();
        session.settle().await;

        assert_eq!(outcome, StepOutcome::Revisited);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.snapshot().unwrap().fields, fields);
    }

    #[tokio::test]
    async fn test_failed_submission_shows_fallback() {
        let gateway = Arc::new(RecordingGateway {
            fail: true,
            ..Default::default()
        });
        let session = onboarding(gateway.clone());
        session.start().unwrap();
        for input in ["Asha", "9876543210", "Acme"] {
            session.submit_response(input).unwrap();
        }
        session.settle().await;

        let view = session.view().unwrap();
        assert!(matches!(view.submission, SubmissionStatus::Failed { .. }));
        let last = view.messages.last().unwrap();
        assert!(last.text.contains("https://wa.me/"), "{}", last.text);
    }

    #[tokio::test]
    async fn test_listener_sees_every_change() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = onboarding(gateway);
        let seen = Arc::new(Mutex::new(Vec::<usize>::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(Arc::new(move |view: &SessionView| {
            sink.lock().unwrap().push(view.messages.len());
        }));

        session.start().unwrap();
        session.submit_response("Asha").unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 2);
        assert_eq!(*seen.last().unwrap(), 3);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_errors_leave_session_unchanged() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = session_with(interactive_phone(), Arc::new(ImmediateScheduler), gateway);
        session.start().unwrap();
        let before = session.snapshot().unwrap();

        assert_eq!(session.submit_response("  ").unwrap_err(), TalError::EmptyInput);
        assert!(session.select_option("Z").unwrap_err().is_validation());
        assert_eq!(session.snapshot().unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_messages_reveal_in_order_after_delays() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = session_with(
            interactive_phone(),
            Arc::new(TokioScheduler::new()),
            gateway,
        );

        session.start().unwrap();
        let view = session.view().unwrap();
        assert!(view.messages.is_empty());
        assert!(view.typing);

        tokio::time::sleep(Duration::from_secs(10)).await;

        let state = session.snapshot().unwrap();
        assert_eq!(state.log.visible().len(), state.log.len());
        assert!(!state.typing);
        let visible: Vec<&str> = state.log.visible().iter().map(|m| m.id.as_str()).collect();
        let all: Vec<&str> = state.log.entries().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(visible, all);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_message_waits_behind_pending_reply() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = session_with(chat_onboarding(), Arc::new(TokioScheduler::new()), gateway);

        session.start().unwrap();
        session.submit_response("Asha").unwrap();
        tokio::task::yield_now().await;

        // The greeting is still typing, so the answer cannot overtake it.
        assert!(session.view().unwrap().messages.is_empty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let view = session.view().unwrap();
        assert_eq!(view.messages.len(), 3);
        assert_eq!(view.messages[1].sender, MessageSender::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_reveals_and_submission() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = session_with(chat_onboarding(), Arc::new(TokioScheduler::new()), gateway);
        session.start().unwrap();

        session.shutdown();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(session.view().unwrap().messages.is_empty());
        assert!(session.submit_response("Asha").is_err());
    }

    #[test]
    fn test_listener_can_shut_down_during_immediate_reveal() {
        let session = onboarding(Arc::new(RecordingGateway::default()));
        let handle = session.clone();
        session.subscribe(Arc::new(move |view: &SessionView| {
            if !view.messages.is_empty() {
                handle.shutdown();
            }
        }));

        let runner = session.clone();
        assert!(returns_in_time(move || runner.start().is_ok()));

        assert!(session.is_shut_down());
        assert_eq!(session.view().unwrap().messages.len(), 1);
        assert!(session.submit_response("Asha").is_err());
    }

    #[test]
    fn test_listener_can_answer_during_immediate_reveal() {
        let session = onboarding(Arc::new(RecordingGateway::default()));
        let handle = session.clone();
        let answered = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&answered);
        session.subscribe(Arc::new(move |view: &SessionView| {
            let prompted = view.messages.iter().any(|m| m.sender == MessageSender::Agent);
            if prompted && !flag.swap(true, Ordering::SeqCst) {
                handle.submit_response("Asha").unwrap();
            }
        }));

        let runner = session.clone();
        assert!(returns_in_time(move || runner.start().is_ok()));

        assert!(answered.load(Ordering::SeqCst));
        let state = session.snapshot().unwrap();
        assert_eq!(state.fields.get(FieldName::Name), Some("Asha"));
        assert_eq!(state.log.visible().len(), state.log.len());
    }

    #[test]
    fn test_fired_reveals_are_not_retained() {
        let session = onboarding(Arc::new(RecordingGateway::default()));
        session.start().unwrap();
        session.submit_response("Asha").unwrap();

        assert!(session.inner.reveals.lock().unwrap().handles.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_pending_reveals_are_retained() {
        let gateway = Arc::new(RecordingGateway::default());
        let session = session_with(chat_onboarding(), Arc::new(TokioScheduler::new()), gateway);
        session.start().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        session.submit_response("Asha").unwrap();

        let reveals = session.inner.reveals.lock().unwrap();
        assert!(!reveals.handles.is_empty());
        assert!(reveals.handles.iter().all(ScheduleHandle::is_pending));
    }
}
