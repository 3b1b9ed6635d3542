//! Dialogue step definitions.

use super::validator::Validator;
use crate::field::FieldName;
use serde::{Deserialize, Serialize};

/// One scripted agent line, shown after a simulated typing delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedLine {
    /// Message template; may contain `{field}` placeholders.
    pub text: String,
    #[serde(default)]
    pub delay_ms: u64,
}

impl ScriptedLine {
    pub fn new(text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            delay_ms,
        }
    }
}

/// An enumerated answer offered by a single-choice step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub key: String,
    pub label: String,
    /// Reply tailored to this choice (e.g. persona-specific encouragement).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ScriptedLine>,
}

impl ChoiceOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            reply: None,
        }
    }

    pub fn with_reply(mut self, text: impl Into<String>, delay_ms: u64) -> Self {
        self.reply = Some(ScriptedLine::new(text, delay_ms));
        self
    }

    /// Returns true when `input` names this option by key or label.
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        self.key.eq_ignore_ascii_case(input) || self.label.eq_ignore_ascii_case(input)
    }
}

/// What kind of answer a step expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseKind {
    FreeText,
    SingleChoice { options: Vec<ChoiceOption> },
}

impl ResponseKind {
    /// Options offered by a single-choice step; empty for free text.
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            ResponseKind::FreeText => &[],
            ResponseKind::SingleChoice { options } => options,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, ResponseKind::SingleChoice { .. })
    }
}

/// A single step of a dialogue script.
///
/// Steps without a `response` are informational: the engine shows their
/// prompt and moves straight on to `next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueStep {
    /// Identifier, unique within the script.
    pub id: String,
    /// Lines Tal says when the step is entered.
    #[serde(default)]
    pub prompt: Vec<ScriptedLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseKind>,
    /// Field the accepted answer is stored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Reaching this step ends collection and triggers the submission.
    #[serde(default)]
    pub terminal: bool,
}

impl DialogueStep {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: Vec::new(),
            response: None,
            field: None,
            validator: None,
            next: None,
            terminal: false,
        }
    }

    /// Creates an informational step.
    pub fn info(id: impl Into<String>) -> Self {
        Self::new(id)
    }

    /// Creates a free-text step storing its answer under `field`.
    pub fn free_text(id: impl Into<String>, field: FieldName) -> Self {
        Self {
            response: Some(ResponseKind::FreeText),
            field: Some(field),
            ..Self::new(id)
        }
    }

    /// Creates a single-choice step storing the chosen label under `field`.
    pub fn choice(id: impl Into<String>, field: FieldName, options: Vec<ChoiceOption>) -> Self {
        Self {
            response: Some(ResponseKind::SingleChoice { options }),
            field: Some(field),
            ..Self::new(id)
        }
    }

    /// Creates the terminal step.
    pub fn terminal(id: impl Into<String>) -> Self {
        Self {
            terminal: true,
            ..Self::new(id)
        }
    }

    /// Appends a prompt line.
    pub fn say(mut self, text: impl Into<String>, delay_ms: u64) -> Self {
        self.prompt.push(ScriptedLine::new(text, delay_ms));
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the step that follows this one.
    pub fn then(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Returns true when the step waits for visitor input.
    pub fn is_interactive(&self) -> bool {
        self.response.is_some()
    }

    /// Options offered by this step; empty unless it is a single-choice step.
    pub fn options(&self) -> &[ChoiceOption] {
        self.response.as_ref().map_or(&[], ResponseKind::options)
    }
}
