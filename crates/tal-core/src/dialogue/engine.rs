//! Dialogue engine.
//!
//! The engine is the single place where session state changes. It reads the
//! script table, validates visitor input, records fields, appends messages in
//! production order and decides when the one submission is issued. It never
//! waits: presentation delays and the submission call are driven by the
//! session runtime, which reports the submission outcome back through
//! [`DialogueEngine::complete_submission`].

use super::script::DialogueScript;
use super::step::{ChoiceOption, DialogueStep, ResponseKind, ScriptedLine};
use super::template::TemplateContext;
use crate::config::BrandConfig;
use crate::error::{Result, TalError};
use crate::lead::{LeadRecord, SubmissionReceipt, SubmissionStatus};
use crate::session::{Message, SessionState};
use std::sync::Arc;

/// Typing delay for rejection messages.
pub const REJECTION_DELAY_MS: u64 = 400;

const CHOOSE_AN_OPTION: &str = "please pick one of the options above.";

/// What an engine operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The session entered its first interactive step.
    Started,
    /// The answer was accepted and the session moved on.
    Advanced { from: String, to: String },
    /// The answer failed validation; the session stays on the step.
    Rejected { reason: String },
    /// Input arrived after the terminal step.
    Revisited,
    /// The submission outcome was recorded.
    SubmissionSettled { succeeded: bool },
}

/// Result of an engine operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub outcome: StepOutcome,
    /// Ids of the messages appended by this operation, in order.
    pub appended: Vec<String>,
    /// Lead to submit. Present at most once per session.
    pub submission: Option<LeadRecord>,
}

impl Transition {
    fn new(outcome: StepOutcome) -> Self {
        Self {
            outcome,
            appended: Vec::new(),
            submission: None,
        }
    }
}

/// Drives sessions through one dialogue script.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    script: Arc<DialogueScript>,
    brand: Arc<BrandConfig>,
}

impl DialogueEngine {
    pub fn new(script: Arc<DialogueScript>, brand: Arc<BrandConfig>) -> Self {
        Self { script, brand }
    }

    pub fn script(&self) -> &DialogueScript {
        &self.script
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    /// Shows the opening lines and stops at the first interactive step.
    pub fn start(&self, session: &mut SessionState) -> Result<Transition> {
        if session.has_started() {
            return Err(TalError::invalid_state(format!(
                "session {} has already started",
                session.id
            )));
        }
        if session.variant != self.script.id() {
            return Err(TalError::invalid_state(format!(
                "session variant '{}' does not match script '{}'",
                session.variant,
                self.script.id()
            )));
        }

        tracing::debug!(
            "[DialogueEngine] Starting session {} with script '{}'",
            session.id,
            self.script.id()
        );

        let mut transition = Transition::new(StepOutcome::Started);
        let start = self.script.start_step().id.clone();
        self.enter(session, &start, &mut transition)?;
        Ok(transition)
    }

    /// Handles typed input for the current step.
    pub fn submit_response(&self, session: &mut SessionState, raw: &str) -> Result<Transition> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(TalError::EmptyInput);
        }
        let step = self.current_step(session)?;

        if step.terminal {
            return Ok(self.revisit(session, input));
        }

        match &step.response {
            Some(ResponseKind::SingleChoice { options }) => {
                match options.iter().find(|o| o.matches(input)) {
                    Some(option) => self.apply_choice(session, step, option, input),
                    None => {
                        let mut transition = Transition::new(StepOutcome::Rejected {
                            reason: CHOOSE_AN_OPTION.to_string(),
                        });
                        self.push(session, Message::user(input), &mut transition);
                        self.push(
                            session,
                            Message::agent(CHOOSE_AN_OPTION, REJECTION_DELAY_MS),
                            &mut transition,
                        );
                        Ok(transition)
                    }
                }
            }
            Some(ResponseKind::FreeText) => {
                let mut transition = Transition::new(StepOutcome::Started);
                self.push(session, Message::user(input), &mut transition);

                if let Some(Err(reason)) = step.validator.as_ref().map(|v| v.check(input)) {
                    tracing::debug!(
                        "[DialogueEngine] Rejected input at step '{}': {}",
                        step.id,
                        reason
                    );
                    self.push(
                        session,
                        Message::agent(reason.clone(), REJECTION_DELAY_MS),
                        &mut transition,
                    );
                    transition.outcome = StepOutcome::Rejected { reason };
                    return Ok(transition);
                }

                if let Some(field) = step.field {
                    session.fields.update(field, input);
                }
                self.advance(session, step, transition)
            }
            None => Err(TalError::invalid_state(format!(
                "step '{}' does not accept input",
                step.id
            ))),
        }
    }

    /// Resolves a single-choice step by option key.
    pub fn select_option(&self, session: &mut SessionState, key: &str) -> Result<Transition> {
        let step = self.current_step(session)?;
        let options = match &step.response {
            Some(ResponseKind::SingleChoice { options }) => options,
            _ => {
                return Err(TalError::NotAChoice {
                    step: step.id.clone(),
                });
            }
        };

        let key = key.trim();
        let option = options
            .iter()
            .find(|o| o.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| TalError::validation(&step.id, format!("unknown option '{key}'")))?;

        self.apply_choice(session, step, option, &option.label)
    }

    /// Records the submission outcome and appends the closing lines.
    ///
    /// Returns `None` when no submission is in flight, so a repeated or late
    /// report changes nothing.
    pub fn complete_submission(
        &self,
        session: &mut SessionState,
        outcome: &Result<SubmissionReceipt>,
    ) -> Option<Transition> {
        if session.submission != SubmissionStatus::InFlight {
            tracing::debug!(
                "[DialogueEngine] Ignoring submission report for session {} ({:?})",
                session.id,
                session.submission
            );
            return None;
        }

        let closing = self.script.closing();
        let (status, lines, succeeded) = match outcome {
            Ok(_) => (SubmissionStatus::Succeeded, &closing.submitted, true),
            Err(e) => (
                SubmissionStatus::Failed {
                    reason: e.to_string(),
                },
                &closing.failed,
                false,
            ),
        };
        session.submission = status;

        let mut transition = Transition::new(StepOutcome::SubmissionSettled { succeeded });
        self.say(session, lines, &mut transition);
        Some(transition)
    }

    fn current_step(&self, session: &SessionState) -> Result<&DialogueStep> {
        let step_id = session
            .current_step
            .as_deref()
            .ok_or_else(|| TalError::invalid_state("session has not started"))?;
        self.script
            .lookup(step_id)
            .ok_or_else(|| TalError::not_found("dialogue step", step_id))
    }

    fn revisit(&self, session: &mut SessionState, input: &str) -> Transition {
        let mut transition = Transition::new(StepOutcome::Revisited);
        self.push(session, Message::user(input), &mut transition);
        self.say(session, &self.script.closing().revisit, &mut transition);
        transition
    }

    fn apply_choice(
        &self,
        session: &mut SessionState,
        step: &DialogueStep,
        option: &ChoiceOption,
        echo: &str,
    ) -> Result<Transition> {
        session.log.remove_pending_options();

        let mut transition = Transition::new(StepOutcome::Started);
        self.push(session, Message::user(echo), &mut transition);
        if let Some(field) = step.field {
            session.fields.update(field, option.label.as_str());
        }
        if let Some(reply) = &option.reply {
            self.say(session, std::slice::from_ref(reply), &mut transition);
        }
        self.advance(session, step, transition)
    }

    fn advance(
        &self,
        session: &mut SessionState,
        from: &DialogueStep,
        mut transition: Transition,
    ) -> Result<Transition> {
        let next = from.next.as_deref().ok_or_else(|| {
            TalError::internal(format!("step '{}' has no successor", from.id))
        })?;
        transition.outcome = StepOutcome::Advanced {
            from: from.id.clone(),
            to: next.to_string(),
        };
        self.enter(session, next, &mut transition)?;
        Ok(transition)
    }

    /// Enters `step_id`, auto-advancing through informational steps.
    fn enter(
        &self,
        session: &mut SessionState,
        step_id: &str,
        transition: &mut Transition,
    ) -> Result<()> {
        let mut step = self
            .script
            .lookup(step_id)
            .ok_or_else(|| TalError::not_found("dialogue step", step_id))?;

        loop {
            session.current_step = Some(step.id.clone());
            self.say(session, &step.prompt, transition);

            if step.terminal {
                transition.submission = self.begin_submission(session);
                return Ok(());
            }
            if let Some(response) = &step.response {
                if response.is_choice() {
                    let options = response.options().to_vec();
                    self.push(session, Message::options(options), transition);
                }
                return Ok(());
            }

            let next = step.next.as_deref().unwrap_or_default();
            step = self
                .script
                .lookup(next)
                .ok_or_else(|| TalError::not_found("dialogue step", next))?;
        }
    }

    /// Issues the lead for submission unless one was already issued.
    fn begin_submission(&self, session: &mut SessionState) -> Option<LeadRecord> {
        if session.submission_attempted() {
            return None;
        }
        session.submission = SubmissionStatus::InFlight;

        let record = LeadRecord::new(
            session.variant.clone(),
            self.script.intake(),
            &self.brand,
            session.fields.snapshot(),
            &session.context,
        );
        tracing::info!(
            "[DialogueEngine] Session {} reached the terminal step, submitting lead {}",
            session.id,
            record.id
        );
        Some(record)
    }

    fn say(&self, session: &mut SessionState, lines: &[ScriptedLine], transition: &mut Transition) {
        for line in lines {
            let text = TemplateContext::new(&session.fields, &self.brand).render(&line.text);
            self.push(session, Message::agent(text, line.delay_ms), transition);
        }
    }

    fn push(&self, session: &mut SessionState, message: Message, transition: &mut Transition) {
        transition.appended.push(message.id.clone());
        session.log.append(message);
    }
}
