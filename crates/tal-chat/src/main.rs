use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;

use tal_application::{ChatSession, ChatSessionFactory, ImmediateScheduler, TokioScheduler};
use tal_core::TalError;
use tal_core::dialogue::{CHAT_WIDGET, ChoiceOption, ScriptRepository, StepOutcome};
use tal_core::lead::{LeadGateway, PageContext, SubmissionStatus};
use tal_core::scheduler::Scheduler;
use tal_core::session::{MessageKind, MessageSender, SessionView};
use tal_infrastructure::{BrandStorage, TomlScriptRepository};
use tal_interaction::{HttpLeadGateway, LoggingGateway};

/// Chat with Tal in the terminal.
#[derive(Parser, Debug)]
#[command(name = "tal-chat", version, about)]
struct Args {
    /// Dialogue variant to run
    #[arg(long, default_value = CHAT_WIDGET)]
    variant: String,

    /// Base URL of the intake service (e.g. http://localhost:3000)
    #[arg(long)]
    intake_url: Option<String>,

    /// Page the visitor "opened"; its query string is sent as UTM data
    #[arg(long, default_value = "https://tal.example/")]
    page_url: String,

    /// Log the lead instead of submitting it
    #[arg(long)]
    dry_run: bool,

    /// Show scripted messages without typing delays
    #[arg(long)]
    instant: bool,

    /// List the available variants and exit
    #[arg(long)]
    list: bool,
}

/// Options of the choice step currently on screen.
type OptionBoard = Arc<Mutex<Vec<ChoiceOption>>>;

/// Rustyline helper completing and hinting the keys of the visible options.
struct CliHelper {
    options: OptionBoard,
}

impl CliHelper {
    fn new(options: OptionBoard) -> Self {
        Self { options }
    }

    fn keys(&self) -> Vec<String> {
        self.options
            .lock()
            .map(|options| options.iter().map(|o| o.key.clone()).collect())
            .unwrap_or_default()
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let candidates = self
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(line))
            .map(|key| Pair {
                display: key.clone(),
                replacement: key,
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.keys().iter().any(|key| key == line) {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() {
            return None;
        }
        self.keys()
            .into_iter()
            .find(|key| key.starts_with(line) && key.len() > line.len())
            .map(|key| key[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

/// Prints messages as they are revealed.
struct Renderer {
    shown: HashSet<String>,
    typing: bool,
    submission: SubmissionStatus,
    options: OptionBoard,
}

impl Renderer {
    fn new(options: OptionBoard) -> Self {
        Self {
            shown: HashSet::new(),
            typing: false,
            submission: SubmissionStatus::default(),
            options,
        }
    }

    fn render(&mut self, view: &SessionView) {
        let mut visible_options = Vec::new();

        for message in &view.messages {
            if let MessageKind::Options { options } = &message.kind {
                visible_options = options.clone();
            }
            if !self.shown.insert(message.id.clone()) {
                continue;
            }

            match (&message.kind, message.sender) {
                (MessageKind::Options { options }, _) => {
                    for (index, option) in options.iter().enumerate() {
                        println!(
                            "    {} {}",
                            format!("{})", index + 1).bright_yellow(),
                            option.label
                        );
                    }
                }
                (MessageKind::Text, MessageSender::Agent) => {
                    for line in message.text.lines() {
                        println!("{} {}", "tal:".bright_magenta().bold(), line.bright_blue());
                    }
                }
                (MessageKind::Text, MessageSender::User) => {
                    println!("{} {}", "you:".green().bold(), message.text.green());
                }
            }
        }

        if let Ok(mut board) = self.options.lock() {
            *board = visible_options;
        }

        if view.typing && !self.typing {
            println!("{}", "tal is typing...".bright_black());
        }
        self.typing = view.typing;

        if view.submission != self.submission {
            match &view.submission {
                SubmissionStatus::InFlight => println!("{}", "(sending your details)".bright_black()),
                SubmissionStatus::Failed { reason } => {
                    println!("{}", format!("(submission failed: {})", reason).bright_black())
                }
                _ => {}
            }
            self.submission = view.submission.clone();
        }
    }
}

/// Maps input on a choice step to an option: a 1-based number or an exact key.
fn pick_option<'a>(options: &'a [ChoiceOption], input: &str) -> Option<&'a ChoiceOption> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        if (1..=options.len()).contains(&number) {
            return options.get(number - 1);
        }
    }
    options.iter().find(|o| o.key.eq_ignore_ascii_case(trimmed))
}

fn dispatch(session: &ChatSession, options: &OptionBoard, input: &str) -> tal_core::error::Result<StepOutcome> {
    let choice = options
        .lock()
        .ok()
        .and_then(|options| pick_option(&options, input).map(|o| o.key.clone()));

    match choice {
        Some(key) => session.select_option(&key),
        None => session.submit_response(input),
    }
}

fn build_gateway(args: &Args) -> Arc<dyn LeadGateway> {
    match (&args.intake_url, args.dry_run) {
        (Some(url), false) => {
            tracing::info!("Submitting leads to {}", url);
            Arc::new(HttpLeadGateway::new(url.clone()))
        }
        _ => {
            println!("{}", "(dry run: the lead will be logged, not sent)".bright_black());
            Arc::new(LoggingGateway)
        }
    }
}

/// The main entry point for the Tal terminal chat.
///
/// Runs one dialogue session: scripted messages are printed as they are
/// revealed, each line typed at the prompt is routed to the session.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // ===== Backend Initialization =====
    let scripts: Arc<dyn ScriptRepository> = Arc::new(TomlScriptRepository::default_location()?);

    if args.list {
        for script in scripts.get_all().await? {
            println!("{}  {}", script.id().bright_cyan(), script.description());
        }
        return Ok(());
    }

    let brand = BrandStorage::new()
        .context("Failed to resolve brand file path")?
        .load()
        .context("Failed to load brand.toml")?;

    let timers = (!args.instant).then(TokioScheduler::new);
    let scheduler: Arc<dyn Scheduler> = match &timers {
        Some(timers) => Arc::new(timers.clone()),
        None => Arc::new(ImmediateScheduler),
    };

    let factory = ChatSessionFactory::new(
        Arc::clone(&scripts),
        Arc::new(brand),
        scheduler,
        build_gateway(&args),
    );
    let session = factory
        .create(&args.variant, PageContext::from_url(&args.page_url))
        .await?;

    // ===== Rendering =====
    let options: OptionBoard = Arc::new(Mutex::new(Vec::new()));
    let (view_tx, mut view_rx) = mpsc::unbounded_channel::<SessionView>();
    session.subscribe(Arc::new(move |view: &SessionView| {
        let _ = view_tx.send(view.clone());
    }));

    let mut renderer = Renderer::new(Arc::clone(&options));
    let render_task = tokio::spawn(async move {
        while let Some(view) = view_rx.recv().await {
            renderer.render(&view);
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(Arc::clone(&options))));

    println!("{}", format!("=== Tal ({}) ===", args.variant).bright_magenta().bold());
    println!("{}", "Type your answers, a number to pick an option, or 'quit' to exit.".bright_black());
    println!();

    session.start()?;

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match dispatch(&session, &options, trimmed) {
                    Ok(_) | Err(TalError::EmptyInput) => {}
                    Err(TalError::Validation { message, .. }) => {
                        println!("{}", message.yellow());
                    }
                    Err(e) => {
                        eprintln!("{}", format!("Error: {}", e).red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Let an in-flight submission finish before tearing the session down
    session.settle().await;
    session.shutdown();
    if let Some(timers) = &timers {
        timers.cancel_all();
    }
    render_task.abort();

    Ok(())
}
