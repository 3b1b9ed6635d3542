//! Dialogue script and engine module.
//!
//! A funnel variant is a [`DialogueScript`]: an ordered chain of
//! [`DialogueStep`]s. One [`DialogueEngine`] implementation drives every
//! variant; variants differ only in data.
//!
//! # Module Structure
//!
//! - `step`: Step definitions (`DialogueStep`, `ResponseKind`, `ChoiceOption`, `ScriptedLine`)
//! - `validator`: Declarative input validators (`Validator`)
//! - `template`: `{field}` placeholder rendering (`TemplateContext`)
//! - `script`: Validated script table (`DialogueScript`, `ClosingScript`)
//! - `engine`: The state machine (`DialogueEngine`, `Transition`)
//! - `preset`: Built-in funnel variants
//! - `repository`: Repository trait for externally defined scripts
//!
//! # Usage
//!
//! ```ignore
//! use tal_core::dialogue::{DialogueEngine, get_default_scripts};
//! ```

mod engine;
pub mod preset;
mod repository;
mod script;
mod step;
mod template;
mod validator;

// Re-export public API
pub use engine::{DialogueEngine, StepOutcome, Transition};
pub use preset::{get_default_scripts, CHAT_ONBOARDING, CHAT_WIDGET, INTERACTIVE_PHONE};
pub use repository::ScriptRepository;
pub use script::{ClosingScript, DialogueScript, ScriptDefinition};
pub use step::{ChoiceOption, DialogueStep, ResponseKind, ScriptedLine};
pub use template::TemplateContext;
pub use validator::Validator;
