//! Built-in dialogue scripts.
//!
//! Each landing-page surface runs one of these variants:
//! - `chat-widget`: company-branded widget asking for the visitor's intent
//!   first, then phone, name and workplace
//! - `chat-onboarding`: short name / phone / workplace flow
//! - `interactive-phone`: phone mockup with persona selection and the full
//!   job profile (email, role, experience, city, skill)
//!
//! Additional variants can be supplied as TOML files and loaded through a
//! [`ScriptRepository`](super::ScriptRepository).

use super::script::{ClosingScript, DialogueScript, ScriptDefinition};
use super::step::{ChoiceOption, DialogueStep, ScriptedLine};
use super::validator::Validator;
use crate::field::FieldName;
use crate::lead::IntakeFormat;

pub const CHAT_WIDGET: &str = "chat-widget";
pub const CHAT_ONBOARDING: &str = "chat-onboarding";
pub const INTERACTIVE_PHONE: &str = "interactive-phone";

fn lines(items: &[(&str, u64)]) -> Vec<ScriptedLine> {
    items
        .iter()
        .map(|(text, delay_ms)| ScriptedLine::new(*text, *delay_ms))
        .collect()
}

fn build(definition: ScriptDefinition) -> DialogueScript {
    let id = definition.id.clone();
    DialogueScript::new(definition)
        .unwrap_or_else(|e| panic!("built-in script '{id}' is invalid: {e}"))
}

/// The company-branded chat widget.
pub fn chat_widget() -> DialogueScript {
    build(ScriptDefinition {
        id: CHAT_WIDGET.to_string(),
        description: "Branded widget: intent, WhatsApp number, name, workplace".to_string(),
        intake: IntakeFormat::RegisterLead,
        start: "intro".to_string(),
        steps: vec![
            DialogueStep::info("intro")
                .say("hi, my name is tal", 500)
                .say(
                    "i help {brand} employees find better opportunities in {market}.",
                    700,
                )
                .then("ask_intent"),
            DialogueStep::free_text("ask_intent", FieldName::Intent)
                .say(
                    "tell me what you're looking for next (role, location, salary...)",
                    800,
                )
                .validate(Validator::non_blank("tell me a little about what you're looking for."))
                .then("ask_phone"),
            DialogueStep::free_text("ask_phone", FieldName::Phone)
                .say("got it. sounds like we can help with that.", 500)
                .say("to send you relevant jobs, i need a couple of details.", 600)
                .say("what's your WhatsApp number?", 500)
                .validate(Validator::min_digits(
                    10,
                    "hmm, that doesn't look like a valid number. please enter your 10+ digit WhatsApp number.",
                ))
                .then("ask_name"),
            DialogueStep::free_text("ask_name", FieldName::Name)
                .say("thanks. and what's your name?", 500)
                .then("ask_workplace"),
            DialogueStep::free_text("ask_workplace", FieldName::Workplace)
                .say("nice to meet you, {name}!", 500)
                .say("which team or office do you work in at {brand}?", 600)
                .then("final"),
            DialogueStep::terminal("final"),
        ],
        closing: ClosingScript {
            submitted: lines(&[
                ("perfect. i'm going to text you on WhatsApp with 1 serious job a day.", 600),
                ("tap below to open our chat now: {whatsapp_link}", 500),
            ]),
            failed: lines(&[(
                "couldn't save your details right now, but you can still open WhatsApp: {whatsapp_link}",
                500,
            )]),
            revisit: lines(&[(
                "i've already saved your details. check WhatsApp for updates!",
                400,
            )]),
        },
    })
}

/// The short onboarding chat.
pub fn chat_onboarding() -> DialogueScript {
    build(ScriptDefinition {
        id: CHAT_ONBOARDING.to_string(),
        description: "Short onboarding: name, WhatsApp number, workplace".to_string(),
        intake: IntakeFormat::ChatOnboarding,
        start: "ask_name".to_string(),
        steps: vec![
            DialogueStep::free_text("ask_name", FieldName::Name)
                .say("hey, i'm tal 👋 what's your name?", 400)
                .then("ask_phone"),
            DialogueStep::free_text("ask_phone", FieldName::Phone)
                .say("nice to meet you, {name}. what's your whatsapp number?", 500)
                .validate(Validator::min_digits(
                    10,
                    "hmm, that doesn't look like a valid number. please enter your 10+ digit whatsapp number.",
                ))
                .then("ask_company"),
            DialogueStep::free_text("ask_company", FieldName::Workplace)
                .say("got it. where do you work right now? (company / team)", 500)
                .then("done"),
            DialogueStep::terminal("done")
                .say("perfect. i'll use this to send you sharper job matches.", 500),
        ],
        closing: ClosingScript {
            submitted: lines(&[("i'll message you on whatsapp soon with your first job. 🟢", 700)]),
            failed: lines(&[(
                "i couldn't save that just now. message me directly instead: {whatsapp_link}",
                600,
            )]),
            revisit: lines(&[("you're all set 👍 check whatsapp for updates!", 400)]),
        },
    })
}

/// The interactive phone mockup with persona selection.
pub fn interactive_phone() -> DialogueScript {
    let personas = vec![
        ChoiceOption::new("A", "I'm underpaid where I am").with_reply(
            "i get it. let's find you something that pays what you're actually worth 💰",
            600,
        ),
        ChoiceOption::new("B", "I'm actively job hunting")
            .with_reply("perfect timing. let's speed this up ⚡", 600),
        ChoiceOption::new("C", "I've been laid off")
            .with_reply("been there. let's get you back on track fast 🚀", 600),
        ChoiceOption::new("D", "Just exploring options")
            .with_reply("smart move. i'll show you what's out there 👀", 600),
        ChoiceOption::new("E", "I hire for roles")
            .with_reply("nice! i can help you find great talent too 🤝", 600),
    ];
    let experience = ["0-1", "1-3", "3-5", "5-8", "8+"]
        .iter()
        .map(|band| ChoiceOption::new(*band, format!("{band} years")))
        .collect();
    let skills = vec![
        ChoiceOption::new("backend", "Software / Backend"),
        ChoiceOption::new("frontend", "Frontend / Web"),
        ChoiceOption::new("data", "Data / ML"),
        ChoiceOption::new("product", "Product Management"),
        ChoiceOption::new("design", "Design (UI/UX)"),
        ChoiceOption::new("sales", "Sales"),
        ChoiceOption::new("marketing", "Marketing / Growth"),
        ChoiceOption::new("other", "Other"),
    ];

    build(ScriptDefinition {
        id: INTERACTIVE_PHONE.to_string(),
        description: "Phone mockup: persona, contact details and job profile".to_string(),
        intake: IntakeFormat::Lead,
        start: "intro".to_string(),
        steps: vec![
            DialogueStep::info("intro")
                .say("hey, i'm tal 👋", 500)
                .say("your job-fixing agent on whatsapp", 800)
                .say("i send you 1 serious job a day. no spam, no job board nonsense", 1000)
                .then("persona"),
            DialogueStep::choice("persona", FieldName::Persona, personas)
                .say("first, tell me what brings you here?", 800)
                .then("ask_name"),
            DialogueStep::free_text("ask_name", FieldName::Name)
                .say("let's get you set up. what's your name?", 800)
                .validate(Validator::non_blank("what should i call you?"))
                .then("ask_phone"),
            DialogueStep::free_text("ask_phone", FieldName::Phone)
                .say("nice to meet you, {name}! 🙌", 600)
                .say("what's your whatsapp number?", 600)
                .validate(Validator::min_digits(
                    7,
                    "that number looks too short. what's your whatsapp number?",
                ))
                .then("ask_email"),
            DialogueStep::free_text("ask_email", FieldName::Email)
                .say("got it! and your email?", 600)
                .validate(Validator::email("that doesn't look like an email. try again?"))
                .then("ask_role"),
            DialogueStep::free_text("ask_role", FieldName::Role)
                .say("what's your current role?", 600)
                .then("experience"),
            DialogueStep::choice("experience", FieldName::Experience, experience)
                .say("how many years of experience do you have?", 600)
                .then("ask_city"),
            DialogueStep::free_text("ask_city", FieldName::City)
                .say("and which city are you in?", 600)
                .then("skill"),
            DialogueStep::choice("skill", FieldName::Skill, skills)
                .say("last one. what's your primary skill area?", 600)
                .then("done"),
            DialogueStep::terminal("done")
                .say("perfect, that's all i need! 🎉", 600)
                .say("let me set you up...", 400),
        ],
        closing: ClosingScript {
            submitted: lines(&[
                ("you're in! i'll text you on whatsapp shortly 📱", 800),
                ("expect your first job within 24 hours", 600),
            ]),
            failed: lines(&[
                ("oops, something went wrong on my side.", 600),
                ("you can still reach me on whatsapp: {whatsapp_link}", 500),
            ]),
            revisit: lines(&[("you're already in! check whatsapp for your first job.", 400)]),
        },
    })
}

/// Returns the built-in dialogue scripts.
pub fn get_default_scripts() -> Vec<DialogueScript> {
    vec![chat_widget(), chat_onboarding(), interactive_phone()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scripts_are_valid_and_unique() {
        let scripts = get_default_scripts();
        let ids: Vec<&str> = scripts.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![CHAT_WIDGET, CHAT_ONBOARDING, INTERACTIVE_PHONE]);
    }

    #[test]
    fn test_chat_widget_chain() {
        let script = chat_widget();
        let chain: Vec<&str> = script.chain().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            chain,
            vec!["intro", "ask_intent", "ask_phone", "ask_name", "ask_workplace", "final"]
        );
        assert_eq!(script.intake(), IntakeFormat::RegisterLead);
    }

    #[test]
    fn test_phone_thresholds_differ_per_variant() {
        let widget = chat_widget();
        let phone = interactive_phone();
        let widget_rule = widget.lookup("ask_phone").unwrap().validator.as_ref().unwrap();
        let phone_rule = phone.lookup("ask_phone").unwrap().validator.as_ref().unwrap();

        assert!(widget_rule.check("9876543").is_err());
        assert!(phone_rule.check("9876543").is_ok());
    }

    #[test]
    fn test_every_persona_has_a_reply() {
        let script = interactive_phone();
        let persona = script.lookup("persona").unwrap();
        assert_eq!(persona.options().len(), 5);
        assert!(persona.options().iter().all(|o| o.reply.is_some()));
    }

    #[test]
    fn test_scripts_survive_toml_round_trip() {
        for script in get_default_scripts() {
            let text = toml::to_string(&script).unwrap();
            let parsed = DialogueScript::from_toml_str(&text).unwrap();
            assert_eq!(parsed, script);
        }
    }
}
