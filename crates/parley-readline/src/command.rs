//! REPL command parsing.

use anyhow::{Result, anyhow, bail};
use parley_core::chat::MessageId;
use parley_core::language::{SUPPORTED_LANGUAGES, SupportedLanguage};

pub const COMMANDS: [&str; 10] = [
    "/type", "/list", "/open", "/close", "/lang", "/translate", "/summarize", "/reset", "/help", "/status",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: typed, then sent.
    Send(String),
    /// Feed the typing detector only.
    Type(String),
    List,
    Open(MessageId),
    Close,
    Lang(SupportedLanguage),
    Translate,
    Summarize,
    Reset,
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Ok(Some(Command::Quit));
    }
    if !trimmed.starts_with('/') {
        return Ok(Some(Command::Send(trimmed.to_string())));
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match name {
        "/type" => Command::Type(arg.to_string()),
        "/list" => Command::List,
        "/open" => {
            let id = arg
                .parse::<u64>()
                .map_err(|_| anyhow!("Usage: /open <message id>"))?;
            Command::Open(MessageId::new(id))
        }
        "/close" => Command::Close,
        "/lang" => {
            let lang = SupportedLanguage::parse(arg).ok_or_else(|| {
                let codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code()).collect();
                anyhow!("Usage: /lang <{}>", codes.join("|"))
            })?;
            Command::Lang(lang)
        }
        "/translate" => Command::Translate,
        "/summarize" => Command::Summarize,
        "/reset" => Command::Reset,
        "/status" => Command::Status,
        "/help" => Command::Help,
        other => bail!("Unknown command: {other}"),
    };
    Ok(Some(command))
}
