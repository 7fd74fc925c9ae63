//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};

use super::command::{COMMAND_NAMES, COMMAND_PREFIX, argument_offset};
use crate::completion::{CompletionContext, CompletionEngine};
use crate::formatter::kind_style;
use crate::value::Value;

/// Path completer for reedline
pub struct PathCompleter {
    /// Completion engine for intelligent suggestions
    completion_engine: CompletionEngine,

    /// Document being browsed
    root: Arc<Value>,

    /// Color suggestions by kind
    use_colors: bool,
}

impl PathCompleter {
    /// Create a new path completer
    ///
    /// # Arguments
    /// * `completion_engine` - Engine producing the candidates
    /// * `root` - Document the paths are resolved against
    /// * `use_colors` - Style suggestions by completion kind
    pub fn new(completion_engine: CompletionEngine, root: Arc<Value>, use_colors: bool) -> Self {
        Self {
            completion_engine,
            root,
            use_colors,
        }
    }

    fn complete_command_name(&self, line: &str, pos: usize) -> Vec<Suggestion> {
        // cursor in front of the prefix
        let Some(typed) = line.get(COMMAND_PREFIX.len_utf8()..pos) else {
            return Vec::new();
        };
        COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(typed))
            .map(|name| Suggestion {
                value: format!("{COMMAND_PREFIX}{name}"),
                description: None,
                style: None,
                extra: None,
                span: Span::new(0, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}

impl Completer for PathCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let pos = pos.min(line.len());
        if !line.is_char_boundary(pos) {
            return Vec::new();
        }

        let start = match argument_offset(line) {
            Some(start) if start <= pos => start,
            _ if line.starts_with(COMMAND_PREFIX) => return self.complete_command_name(line, pos),
            _ => return Vec::new(),
        };

        // completion text replaces everything from the argument start to the cursor
        let input = &line[start..pos];
        let ctx = CompletionContext::new(&self.root);

        self.completion_engine
            .filter_completions(input, &ctx)
            .into_iter()
            .map(|c| Suggestion {
                description: (!c.detail.is_empty()).then(|| c.detail.clone()),
                style: self.use_colors.then(|| kind_style(c.kind)),
                value: c.text,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}
