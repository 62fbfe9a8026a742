//! The verb surface.

use thiserror::Error;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Offer food.
    Feed,
    /// Try to play.
    Play,
    /// Let the pet rest.
    Sleep,
    /// Show stats and mood.
    Status,
    /// Ask a free-text question.
    Ask(String),
    /// Store a note.
    Remember(String),
    /// List recent memories.
    Memories,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
}

/// Input that did not parse into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The verb is not one we know.
    #[error("Unknown command '{0}'. Type 'help' for available commands.")]
    Unknown(String),
    /// The verb needs text after it.
    #[error("Usage: {verb} <text>")]
    MissingArgument {
        /// Which verb was missing its argument.
        verb: &'static str,
    },
}

impl Command {
    /// Parse one input line.
    ///
    /// The verb is case-insensitive; the argument keeps its case. A blank
    /// line parses to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for unknown verbs or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "feed" => Self::Feed,
            "play" => Self::Play,
            "sleep" => Self::Sleep,
            "status" => Self::Status,
            "memories" => Self::Memories,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "ask" => Self::Ask(required(arg, "ask")?),
            "remember" => Self::Remember(required(arg, "remember")?),
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(Some(command))
    }
}

fn required(arg: &str, verb: &'static str) -> Result<String, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument { verb })
    } else {
        Ok(arg.to_string())
    }
}

/// The `help` text.
pub const HELP: &str = "\
Commands:
  feed          - Offer food to Jimbruz
  play          - Try to play gently
  sleep         - Let Jimbruz rest
  status        - Show Jimbruz's current stats
  ask <text>    - Ask Jimbruz something (e.g. ask tell me a joke)
  remember <t>  - Store a memory (Jimbruz notes it)
  memories      - List recent memories
  help          - Show this help
  quit          - Exit";
