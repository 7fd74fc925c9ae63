//! Interactive document browser
//!
//! This module provides a reedline-based shell over a single document:
//! - Path and expression evaluation against the document
//! - Tab completion backed by the [`CompletionEngine`]
//! - File-backed history
//! - Table, shape and function listing commands

mod command;
mod completer;
mod prompt;

pub use command::BrowseCommand;
pub use completer::PathCompleter;
pub use prompt::BrowserPrompt;

use std::io::{Write, stdout};
use std::sync::Arc;

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, DefaultHinter, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, warn};

use crate::completion::CompletionEngine;
use crate::config::{Config, HistoryConfig};
use crate::error::{CelnavError, Result};
use crate::formatter::Formatter;
use crate::path::is_root;
use crate::session::Session;
use crate::shape::detect_shape;
use crate::value::Value;

const COMPLETION_MENU: &str = "completion_menu";

/// Executes browser commands against a document
pub struct CommandRunner {
    session: Session,
    root: Arc<Value>,
    formatter: Formatter,
}

impl CommandRunner {
    /// Create a runner
    ///
    /// # Arguments
    /// * `session` - Engine and registry
    /// * `root` - Document being browsed
    /// * `formatter` - Output formatter
    pub fn new(session: Session, root: Arc<Value>, formatter: Formatter) -> Self {
        Self {
            session,
            root,
            formatter,
        }
    }

    /// Execute a command
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Text to print, `None` for commands
    ///   without output
    pub fn execute(&self, command: &BrowseCommand) -> Result<Option<String>> {
        match command {
            BrowseCommand::Resolve(path) => {
                let value = self.resolve(path)?;
                self.formatter.format_value(&value, false).map(Some)
            }
            BrowseCommand::Table(path) => {
                let value = self.resolve(path)?;
                self.formatter.format_value(&value, true).map(Some)
            }
            BrowseCommand::Shape(path) => {
                let value = match path.as_deref() {
                    Some(path) => self.resolve(path)?,
                    None => self.root.as_ref().clone(),
                };
                Ok(Some(self.formatter.format_shape(&detect_shape(&value))))
            }
            BrowseCommand::Functions(query) => {
                let registry = self.session.registry();
                let groups = match query {
                    Some(query) => vec![("matches".to_string(), registry.search(query))],
                    None => registry.categories(),
                };
                Ok(Some(self.formatter.format_functions(groups)))
            }
            BrowseCommand::Help => Ok(Some(command::help_text().to_string())),
            BrowseCommand::Exit => Ok(None),
        }
    }

    fn resolve(&self, path: &str) -> Result<Value> {
        if is_root(path) {
            return Ok(self.root.as_ref().clone());
        }
        Ok(self.session.resolve(&self.root, path)?)
    }
}

/// Interactive browser over one document
pub struct Browser {
    line_editor: Reedline,
    runner: CommandRunner,
    prompt: BrowserPrompt,
    use_colors: bool,
}

impl Browser {
    /// Create a browser
    ///
    /// # Arguments
    /// * `session` - Engine and registry shared with the completer
    /// * `root` - Document to browse
    /// * `config` - Effective configuration
    /// * `label` - Name shown in the prompt
    ///
    /// # Returns
    /// * `Result<Self>` - New browser or error
    pub fn new(session: Session, root: Value, config: Config, label: &str) -> Result<Self> {
        let root = Arc::new(root);
        let use_colors = config.display.color_output;

        // Tab opens the completion menu, then cycles through it
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let completer = PathCompleter::new(
            CompletionEngine::with_config(session.clone(), config.completion.clone()),
            Arc::clone(&root),
            use_colors,
        );
        let completion_menu = ColumnarMenu::default()
            .with_name(COMPLETION_MENU)
            .with_columns(3)
            .with_column_width(Some(24))
            .with_column_padding(2);

        let mut line_editor = Reedline::create()
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_completer(Box::new(completer))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(completion_menu)))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(Style::new().italic().fg(Color::DarkGray)),
            ))
            .with_ansi_colors(use_colors);

        if let Some(history) = open_history(&config.history)? {
            line_editor = line_editor.with_history(history);
        }

        Ok(Self {
            line_editor,
            runner: CommandRunner::new(
                session,
                root,
                Formatter::from_config(&config.display),
            ),
            prompt: BrowserPrompt::new(label),
            use_colors,
        })
    }

    /// Start the browser loop
    ///
    /// # Returns
    /// * `Result<()>` - Ok when the user leaves the browser
    pub fn run(&mut self) -> Result<()> {
        println!("Type :help for commands, Tab to complete, :quit to leave.");

        loop {
            match self.line_editor.read_line(&self.prompt)? {
                Signal::Success(buffer) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let command = match BrowseCommand::parse(line) {
                        Ok(command) => command,
                        Err(e) => {
                            self.print_error(&e);
                            continue;
                        }
                    };
                    if command == BrowseCommand::Exit {
                        break;
                    }

                    debug!(?command, "executing browser command");
                    match self.runner.execute(&command) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => self.print_error(&e),
                    }
                    stdout().flush()?;
                }
                // Ctrl-C clears the current line
                Signal::CtrlC => continue,
                Signal::CtrlD => break,
                #[allow(unreachable_patterns)]
                _ => break,
            }
        }

        Ok(())
    }

    fn print_error(&self, error: &CelnavError) {
        if self.use_colors {
            eprintln!("{}", Color::Red.paint(format!("Error: {}", error)));
        } else {
            eprintln!("Error: {}", error);
        }
    }
}

/// Open the history configured for the browser.
///
/// A persistent history file that cannot be opened degrades to in-memory
/// history with a warning.
fn open_history(config: &HistoryConfig) -> Result<Option<Box<FileBackedHistory>>> {
    if config.max_size == 0 {
        return Ok(None);
    }

    if config.persist {
        match FileBackedHistory::with_file(config.max_size, config.file_path.clone()) {
            Ok(history) => return Ok(Some(Box::new(history))),
            Err(e) => warn!(
                path = %config.file_path.display(),
                error = %e,
                "history file unavailable, keeping history in memory"
            ),
        }
    }

    FileBackedHistory::new(config.max_size)
        .map(|history| Some(Box::new(history)))
        .map_err(|e| CelnavError::Generic(format!("History error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::error::NavigationError;
    use serde_json::json;

    fn runner() -> CommandRunner {
        let root = Value::from(json!({
            "items": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
            "count": 2
        }));
        let formatter = Formatter::from_config(&DisplayConfig {
            color_output: false,
            ..DisplayConfig::default()
        });
        CommandRunner::new(Session::default(), Arc::new(root), formatter)
    }

    #[test]
    fn test_resolve_command() {
        let output = runner()
            .execute(&BrowseCommand::Resolve("items[1].name".to_string()))
            .unwrap();
        assert_eq!(output.as_deref(), Some("\"b\""));
    }

    #[test]
    fn test_resolve_error_is_reported() {
        let err = runner()
            .execute(&BrowseCommand::Resolve("items.5".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            CelnavError::Navigation(NavigationError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_table_command() {
        let output = runner()
            .execute(&BrowseCommand::Table("items".to_string()))
            .unwrap()
            .unwrap();
        assert!(output.contains("name"));
        assert!(output.lines().count() > 2);
    }

    #[test]
    fn test_shape_command() {
        let runner = runner();
        let root = runner.execute(&BrowseCommand::Shape(None)).unwrap();
        assert_eq!(root.as_deref(), Some("map (length 2)"));

        let items = runner
            .execute(&BrowseCommand::Shape(Some("items".to_string())))
            .unwrap();
        assert_eq!(
            items.as_deref(),
            Some("homogeneous array (length 2, fields: id, name)")
        );
    }

    #[test]
    fn test_functions_command() {
        let output = runner()
            .execute(&BrowseCommand::Functions(Some("upperAscii".to_string())))
            .unwrap()
            .unwrap();
        assert!(output.starts_with("matches"));
        assert!(output.contains("upperAscii"));
    }

    #[test]
    fn test_history_disabled() {
        let config = HistoryConfig {
            max_size: 0,
            file_path: "unused".into(),
            persist: false,
        };
        assert!(open_history(&config).unwrap().is_none());
    }
}
