//! Dialogue script table.
//!
//! A script is the static, validated definition of one conversation variant.
//! `ScriptDefinition` is the raw serde shape (built in code or read from
//! TOML); `DialogueScript` is only obtainable through validation, so the
//! engine can rely on the chain invariants without re-checking them.

use super::step::{DialogueStep, ScriptedLine};
use crate::error::{Result, TalError};
use crate::lead::IntakeFormat;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Lines appended after the terminal step has been reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingScript {
    /// Shown when the intake endpoint accepted the lead.
    pub submitted: Vec<ScriptedLine>,
    /// Shown when the submission failed; should offer the WhatsApp fallback.
    pub failed: Vec<ScriptedLine>,
    /// Shown when the visitor writes again after the terminal step.
    pub revisit: Vec<ScriptedLine>,
}

/// Unvalidated script data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDefinition {
    /// Variant identifier (e.g. `chat-onboarding`).
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Wire format used when submitting the collected lead.
    pub intake: IntakeFormat,
    /// Identifier of the first step.
    pub start: String,
    pub steps: Vec<DialogueStep>,
    #[serde(default)]
    pub closing: ClosingScript,
}

/// A validated dialogue script.
///
/// Invariants established by [`DialogueScript::new`]:
/// - step ids are unique and the start step exists
/// - following `next` from the start visits every step exactly once and ends
///   at the single terminal step (no cycles, no dangling references)
/// - the terminal step has no successor and expects no response
/// - single-choice steps offer at least one option with unique keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScriptDefinition", into = "ScriptDefinition")]
pub struct DialogueScript {
    definition: ScriptDefinition,
    index: HashMap<String, usize>,
}

impl DialogueScript {
    /// Validates a definition and builds the lookup table.
    pub fn new(definition: ScriptDefinition) -> Result<Self> {
        let script_id = definition.id.clone();
        let fail = |message: String| TalError::script(script_id.clone(), message);

        if definition.id.trim().is_empty() {
            return Err(fail("script id must not be empty".to_string()));
        }

        let mut index = HashMap::with_capacity(definition.steps.len());
        for (position, step) in definition.steps.iter().enumerate() {
            if index.insert(step.id.clone(), position).is_some() {
                return Err(fail(format!("duplicate step id '{}'", step.id)));
            }
        }

        if !index.contains_key(&definition.start) {
            return Err(fail(format!("start step '{}' does not exist", definition.start)));
        }

        for step in &definition.steps {
            Self::check_step(step).map_err(&fail)?;
        }

        let terminals = definition.steps.iter().filter(|s| s.terminal).count();
        if terminals != 1 {
            return Err(fail(format!(
                "expected exactly one terminal step, found {terminals}"
            )));
        }

        // Walk the chain from the start step.
        let mut visited = HashSet::with_capacity(definition.steps.len());
        let mut current = definition.start.as_str();
        loop {
            if !visited.insert(current) {
                return Err(fail(format!("cycle detected at step '{current}'")));
            }
            let step = &definition.steps[index[current]];
            match step.next.as_deref() {
                Some(next) if index.contains_key(next) => current = next,
                Some(next) => {
                    return Err(fail(format!(
                        "step '{}' points to unknown step '{next}'",
                        step.id
                    )));
                }
                None if step.terminal => break,
                None => {
                    return Err(fail(format!(
                        "step '{}' has no successor and is not terminal",
                        step.id
                    )));
                }
            }
        }

        if let Some(orphan) = definition
            .steps
            .iter()
            .find(|s| !visited.contains(s.id.as_str()))
        {
            return Err(fail(format!(
                "step '{}' is not reachable from the start step",
                orphan.id
            )));
        }

        Ok(Self { definition, index })
    }

    fn check_step(step: &DialogueStep) -> std::result::Result<(), String> {
        if step.id.trim().is_empty() {
            return Err("step id must not be empty".to_string());
        }
        if step.terminal {
            if step.next.is_some() {
                return Err(format!("terminal step '{}' must not have a successor", step.id));
            }
            if step.response.is_some() {
                return Err(format!("terminal step '{}' must not expect a response", step.id));
            }
        }
        if step.field.is_some() && step.response.is_none() {
            return Err(format!("step '{}' stores a field but expects no response", step.id));
        }
        if step.response.as_ref().is_some_and(|r| r.is_choice()) {
            let options = step.options();
            if options.is_empty() {
                return Err(format!("choice step '{}' has no options", step.id));
            }
            let mut keys = HashSet::with_capacity(options.len());
            for option in options {
                if option.key.trim().is_empty() {
                    return Err(format!("choice step '{}' has an option without a key", step.id));
                }
                if !keys.insert(option.key.to_ascii_lowercase()) {
                    return Err(format!(
                        "choice step '{}' repeats option key '{}'",
                        step.id, option.key
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parses and validates a script from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let definition: ScriptDefinition = toml::from_str(content)?;
        Self::new(definition)
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn intake(&self) -> IntakeFormat {
        self.definition.intake
    }

    pub fn closing(&self) -> &ClosingScript {
        &self.definition.closing
    }

    pub fn lookup(&self, step_id: &str) -> Option<&DialogueStep> {
        self.index
            .get(step_id)
            .map(|&position| &self.definition.steps[position])
    }

    pub fn start_step(&self) -> &DialogueStep {
        &self.definition.steps[self.index[&self.definition.start]]
    }

    /// Steps in chain order, from the start step to the terminal step.
    pub fn chain(&self) -> Vec<&DialogueStep> {
        let mut steps = Vec::with_capacity(self.definition.steps.len());
        let mut current = Some(self.start_step());
        while let Some(step) = current {
            steps.push(step);
            current = step.next.as_deref().and_then(|next| self.lookup(next));
        }
        steps
    }

    pub fn definition(&self) -> &ScriptDefinition {
        &self.definition
    }
}

impl TryFrom<ScriptDefinition> for DialogueScript {
    type Error = TalError;

    fn try_from(definition: ScriptDefinition) -> Result<Self> {
        Self::new(definition)
    }
}

impl From<DialogueScript> for ScriptDefinition {
    fn from(script: DialogueScript) -> Self {
        script.definition
    }
}
