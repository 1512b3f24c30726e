//! Terminal rendering of the chat state.

use colored::Colorize;
use parley_application::{ChatSnapshot, EnrichmentOutcome, PanelView};
use parley_core::chat::{Message, Sender};
use parley_core::language::LanguageNameResolver;

pub fn print_message(message: &Message, selected: bool) {
    let marker = if selected { "▶" } else { " " };
    let id = format!("[{}]", message.id).bright_black();
    let author = match message.sender {
        Sender::User => "you".green().bold(),
        Sender::Bot => "bot".bright_blue().bold(),
    };
    let purpose = message
        .purpose
        .map(|p| format!(" ({p})").bright_magenta().to_string())
        .unwrap_or_default();
    let language = message
        .language
        .as_deref()
        .map(|l| format!("  {l}").bright_black().italic().to_string())
        .unwrap_or_default();

    println!("{marker} {id} {author}{purpose}: {}{language}", message.text);
}

pub fn print_log(snapshot: &ChatSnapshot) {
    let selected = snapshot.panel.as_ref().map(|p| p.selection.id);
    for message in &snapshot.messages {
        print_message(message, selected == Some(message.id));
    }
}

pub fn print_panel(panel: &PanelView, resolver: &LanguageNameResolver) {
    println!("{}", format!("  ⋮ options for [{}]", panel.selection.id).bright_yellow());

    let targets: Vec<String> = panel
        .targets
        .iter()
        .map(|lang| {
            let label = format!("{} ({})", resolver.name_of(lang.code()), lang.code());
            if *lang == panel.target {
                label.bold().underline().to_string()
            } else {
                label
            }
        })
        .collect();
    println!("    Translate to: {}", targets.join(", "));

    let translate = if panel.translating { "Translating..." } else { "/translate" };
    println!("    {}", translate.cyan());
    if panel.can_summarize {
        println!("    {}", "/summarize".cyan());
    }
    if panel.summarizing {
        println!("    {}", "Summarizing...".cyan());
    }
    for error in &panel.errors {
        println!("    {}", error.red());
    }
}

pub fn print_status(snapshot: &ChatSnapshot) {
    println!("{}", snapshot.status_line.bright_black().italic());
}

pub fn print_outcome(outcome: &EnrichmentOutcome) {
    match outcome {
        EnrichmentOutcome::Applied(id) => println!("{}", format!("Updated [{id}]").green()),
        EnrichmentOutcome::Skipped => println!("{}", "Nothing to do".bright_black()),
        EnrichmentOutcome::Failed(message) => println!("{}", message.red()),
    }
}

pub fn print_help() {
    println!("{}", "Type a message and press enter to send it.".bright_black());
    let rows = [
        ("/type <text>", "show the language detected for <text>"),
        ("/list", "show the conversation"),
        ("/open <id>", "open the options of a message"),
        ("/close", "close the options"),
        ("/lang <code>", "choose the translation target (en, pt, es, ru, tr, fr)"),
        ("/translate", "translate the selected message"),
        ("/summarize", "summarize the selected message"),
        ("/reset", "restore the greeting conversation"),
        ("/status", "show the status line"),
        ("quit", "exit"),
    ];
    for (command, description) in rows {
        println!("  {} {}", format!("{command:<14}").bright_cyan(), description.bright_black());
    }
}
