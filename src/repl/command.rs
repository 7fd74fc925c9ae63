//! Browser command parser
//!
//! Lines starting with `:` are browser commands:
//! - `:table <path>`, `:shape [path]`, `:functions [query]`
//! - `:help`, `:quit` / `:exit`
//!
//! Anything else is a path or expression resolved against the document.

use crate::error::{CelnavError, Result};

/// Prefix that marks a browser command
pub const COMMAND_PREFIX: char = ':';

/// Command names offered by the completer
pub const COMMAND_NAMES: &[&str] = &["exit", "functions", "help", "quit", "shape", "table"];

/// Parsed browser input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Resolve and print as JSON
    Resolve(String),

    /// Resolve and print as a table when possible
    Table(String),

    /// Show the shape of the value at an optional path
    Shape(Option<String>),

    /// List functions matching an optional query
    Functions(Option<String>),

    Help,
    Exit,
}

impl BrowseCommand {
    /// Parse a non-empty input line
    ///
    /// # Arguments
    /// * `input` - Trimmed input line
    ///
    /// # Returns
    /// * `Result<BrowseCommand>` - Parsed command or error for unknown commands
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let Some(rest) = trimmed.strip_prefix(COMMAND_PREFIX) else {
            return Ok(BrowseCommand::Resolve(trimmed.to_string()));
        };

        let (name, argument) = split_command(rest);
        match name {
            "exit" | "quit" | "q" => Ok(BrowseCommand::Exit),
            "help" | "h" => Ok(BrowseCommand::Help),
            "shape" => Ok(BrowseCommand::Shape(argument)),
            "functions" | "fn" => Ok(BrowseCommand::Functions(argument)),
            "table" => argument.map(BrowseCommand::Table).ok_or_else(|| {
                CelnavError::Generic("Usage: :table <path>".to_string())
            }),
            _ => Err(CelnavError::Generic(format!(
                "Unknown command: {}{}. Type :help for a list of commands",
                COMMAND_PREFIX, name
            ))),
        }
    }
}

/// Split `name rest...` into the command name and its optional argument
fn split_command(input: &str) -> (&str, Option<String>) {
    match input.split_once(char::is_whitespace) {
        Some((name, argument)) => {
            let argument = argument.trim();
            (
                name,
                (!argument.is_empty()).then(|| argument.to_string()),
            )
        }
        None => (input, None),
    }
}

/// Byte offset where the argument of a command line starts, if the cursor is
/// past the command name.
///
/// Returns 0 for plain path input.
pub fn argument_offset(line: &str) -> Option<usize> {
    if !line.starts_with(COMMAND_PREFIX) {
        return Some(0);
    }
    let name_end = line.find(char::is_whitespace)?;
    let rest = &line[name_end..];
    Some(name_end + (rest.len() - rest.trim_start().len()))
}

pub fn help_text() -> &'static str {
    "Enter a path or expression to resolve it against the document, e.g.
  items[0].name
  _.items.filter(i, i.price > 10)

Commands:
  :table <path>        Render a record array as a table
  :shape [path]        Show the shape of a value
  :functions [query]   List available functions
  :help                Show this help
  :quit, :exit         Leave the browser

Press Tab to complete fields, indices and functions."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        assert_eq!(
            BrowseCommand::parse("  items[0].name ").unwrap(),
            BrowseCommand::Resolve("items[0].name".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(BrowseCommand::parse(":quit").unwrap(), BrowseCommand::Exit);
        assert_eq!(BrowseCommand::parse(":exit").unwrap(), BrowseCommand::Exit);
        assert_eq!(BrowseCommand::parse(":help").unwrap(), BrowseCommand::Help);
        assert_eq!(
            BrowseCommand::parse(":shape").unwrap(),
            BrowseCommand::Shape(None)
        );
        assert_eq!(
            BrowseCommand::parse(":shape  _.items ").unwrap(),
            BrowseCommand::Shape(Some("_.items".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse(":functions upper").unwrap(),
            BrowseCommand::Functions(Some("upper".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse(":table users").unwrap(),
            BrowseCommand::Table("users".to_string())
        );
    }

    #[test]
    fn test_parse_invalid_commands() {
        assert!(BrowseCommand::parse(":table").is_err());
        assert!(BrowseCommand::parse(":nope").is_err());
    }

    #[test]
    fn test_argument_offset() {
        assert_eq!(argument_offset("items.0"), Some(0));
        assert_eq!(argument_offset(":table us"), Some(7));
        assert_eq!(argument_offset(":shape   _.a"), Some(9));
        assert_eq!(argument_offset(":tab"), None);
    }
}
