//! # Command System
//!
//! Slash commands typed at the prompt. Anything that isn't a command is a
//! message for the conversation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added /share and /listen
//! - 1.0.0: Initial command set

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Image(PathBuf),
    Identify,
    /// Raw interval text; parsed leniently by the reminder store
    Remind(String),
    Reminders,
    Forget(String),
    Share,
    Listen(PathBuf),
    Reset,
    Help,
    Quit,
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command '/{0}'. Type /help for the list.")]
    Unknown(String),
}

/// (usage, description) for every command, in help order
pub const COMMANDS: &[(&str, &str)] = &[
    ("/image <path>", "Choose a plant photo"),
    ("/identify", "Identify the chosen photo and get care instructions"),
    ("/remind <days>", "Remind me to water this plant every <days> days"),
    ("/reminders", "List watering reminders"),
    ("/forget <plant>", "Delete the reminder for <plant>"),
    ("/share", "Share this plant's care guide"),
    ("/listen <audio-file>", "Ask a question by voice"),
    ("/reset", "Start over with a new plant"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Message(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "image" | "photo" => Command::Image(PathBuf::from(required(arg, "/image <path>")?)),
        "identify" | "id" => Command::Identify,
        "remind" => Command::Remind(required(arg, "/remind <days>")?.to_string()),
        "reminders" | "list" => Command::Reminders,
        "forget" => Command::Forget(required(arg, "/forget <plant>")?.to_string()),
        "share" => Command::Share,
        "listen" | "voice" => {
            Command::Listen(PathBuf::from(required(arg, "/listen <audio-file>")?))
        }
        "reset" | "new" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(arg)
    }
}

/// Help text for the REPL
pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for (usage, description) in COMMANDS {
        text.push_str(&format!("  {usage:<width$}  {description}\n"));
    }
    text.push_str("Anything else is sent to the assistant as a question.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        assert_eq!(
            parse_command("  How much sun does it need?  ").unwrap(),
            Some(Command::Message("How much sun does it need?".to_string()))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_command("/image ~/Pictures/my fern.jpg").unwrap(),
            Some(Command::Image(PathBuf::from("~/Pictures/my fern.jpg")))
        );
        assert_eq!(
            parse_command("/remind 7").unwrap(),
            Some(Command::Remind("7".to_string()))
        );
        assert_eq!(
            parse_command("/forget  Snake Plant ").unwrap(),
            Some(Command::Forget("Snake Plant".to_string()))
        );
        assert_eq!(
            parse_command("/LISTEN question.ogg").unwrap(),
            Some(Command::Listen(PathBuf::from("question.ogg")))
        );
    }

    #[test]
    fn test_commands_without_arguments() {
        assert_eq!(parse_command("/identify").unwrap(), Some(Command::Identify));
        assert_eq!(parse_command("/reminders").unwrap(), Some(Command::Reminders));
        assert_eq!(parse_command("/share").unwrap(), Some(Command::Share));
        assert_eq!(parse_command("/reset").unwrap(), Some(Command::Reset));
        assert_eq!(parse_command("/q").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            parse_command("/remind").unwrap_err(),
            CommandError::Usage("/remind <days>")
        );
        assert_eq!(
            parse_command("/image   ").unwrap_err().to_string(),
            "Usage: /image <path>"
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("/water now").unwrap_err(),
            CommandError::Unknown("water".to_string())
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for (usage, _) in COMMANDS {
            assert!(help.contains(usage));
        }
    }
}
