mod command;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::time::timeout;

use command::{COMMANDS, Command};
use parley_application::ChatSession;
use parley_core::chat::ConversationRepository;
use parley_infrastructure::{ConfigService, TomlConversationRepository};
use parley_interaction::HttpCapabilityGateway;

/// Chat with on-device language detection, translation and summarization.
#[derive(Parser, Debug)]
#[command(name = "parley", version)]
struct Args {
    /// Config file (default: ~/.config/parley/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Capability server URL, overriding the config file
    #[arg(long)]
    gateway_url: Option<String>,

    /// Conversation snapshot file, overriding the config file
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// rustyline helper completing and highlighting slash commands.
#[derive(Clone)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
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
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for CliHelper {}

fn init_logging(json: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_env("PARLEY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("parley=info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .ok();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}

fn build_session(args: &Args) -> Result<ChatSession> {
    let config_service = match &args.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config();
    if let Some(url) = &args.gateway_url {
        config.gateway.base_url = url.clone();
    }
    if let Some(path) = &args.storage {
        config.storage.conversation_file = Some(path.clone());
    }

    let repository: Arc<dyn ConversationRepository> = match &config.storage.conversation_file {
        Some(path) => Arc::new(TomlConversationRepository::with_path(path.clone())),
        None => Arc::new(TomlConversationRepository::new()?),
    };
    tracing::info!("Capability server: {}", config.gateway.base_url);
    let gateway = Arc::new(HttpCapabilityGateway::new(config.gateway.base_url.clone()));

    Ok(ChatSession::new(gateway, repository, &config))
}

/// Waits for the typing detector to settle on `text` after `/type`.
async fn show_typing(session: &ChatSession, text: &str) {
    let mut settled = session.typing().subscribe_settled();
    settled.borrow_and_update();
    session.on_input(text);

    let wait = session.typing().debounce() + Duration::from_secs(5);
    if timeout(wait, settled.changed()).await.is_err() {
        tracing::debug!("Typing detection did not settle in {:?}", wait);
    }
    println!("{}", session.status_line().bright_black().italic());
}

async fn handle(session: &ChatSession, command: Command) -> Result<()> {
    match command {
        Command::Send(text) => {
            if let Some(message) = session.send(&text).await {
                render::print_message(&message, false);
            }
        }
        Command::Type(text) => show_typing(session, &text).await,
        Command::List => render::print_log(&session.snapshot()),
        Command::Open(id) => {
            if !session.open_options(id) {
                println!("{}", format!("No message [{id}]").yellow());
            }
        }
        Command::Close => session.close_options(),
        Command::Lang(lang) => session.set_target_language(lang),
        Command::Translate => render::print_outcome(&session.translate_selected().await),
        Command::Summarize => render::print_outcome(&session.summarize_selected().await),
        Command::Reset => {
            if session.reset().await? {
                render::print_log(&session.snapshot());
            } else {
                println!("{}", "Nothing to reset".bright_black());
            }
        }
        Command::Status => render::print_status(&session.snapshot()),
        Command::Help => render::print_help(),
        Command::Quit => {}
    }

    if let Some(panel) = session.panel() {
        render::print_panel(&panel, session.service().resolver());
    }
    Ok(())
}

/// Entry point for the Parley REPL.
///
/// Loads configuration, connects to the capability server, restores the
/// saved conversation and reads commands until `quit` or EOF.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let session = build_session(&args)?;
    let status = session.start().await;
    if let Some(error) = &status.error {
        eprintln!("{}", error.red());
    }

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!("{}", "Type a message, '/help' for commands, or 'quit' to exit.".bright_black());
    println!();
    render::print_log(&session.snapshot());
    render::print_status(&session.snapshot());

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let command = match command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", e.to_string().yellow());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());

                if command == Command::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if let Err(e) = handle(&session, command).await {
                    eprintln!("{}", format!("Error: {e:#}").red());
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

    session.shutdown().await;
    Ok(())
}
