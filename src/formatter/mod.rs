//! Output formatting for resolved values, completions and function listings
//!
//! - JSON formatting (plain and pretty-printed, optionally colored)
//! - Table formatting for homogeneous record arrays
//! - Colored completion and function listings

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::TableFormatter;

use nu_ansi_term::{Color, Style};

use crate::completion::{Completion, CompletionKind};
use crate::config::DisplayConfig;
use crate::error::Result;
use crate::registry::FunctionMetadata;
use crate::shape::{Shape, ShapeKind};
use crate::value::Value;

/// Main formatter
pub struct Formatter {
    json: JsonFormatter,
    table: TableFormatter,
    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a formatter from display configuration
    ///
    /// # Arguments
    /// * `config` - Display settings
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            json: JsonFormatter::new(true, config.color_output, 2),
            table: TableFormatter::from_config(config),
            use_colors: config.color_output,
        }
    }

    /// Format a resolved value.
    ///
    /// With `as_table`, homogeneous record arrays are rendered as a table;
    /// every other value falls back to pretty JSON.
    pub fn format_value(&self, value: &Value, as_table: bool) -> Result<String> {
        if as_table {
            if let Some(table) = self.table.format(value) {
                return Ok(table);
            }
        }
        self.json.format(value)
    }

    /// One completion per line: text, kind and detail
    pub fn format_completions(&self, completions: &[Completion]) -> String {
        let width = completions
            .iter()
            .map(|c| c.text.chars().count())
            .max()
            .unwrap_or(0);

        completions
            .iter()
            .map(|c| {
                let text = format!("{:<width$}", c.text);
                let kind = format!("{:<8}", c.kind.to_string());
                format!(
                    "{}  {}  {}",
                    self.paint(kind_style(c.kind), &text),
                    self.paint(Style::new().dimmed(), &kind),
                    c.detail
                )
                .trim_end()
                .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Summary line for a shape
    pub fn format_shape(&self, shape: &Shape) -> String {
        let kind = self.paint(Style::new().bold(), &shape.kind.to_string());
        match shape.kind {
            ShapeKind::HomogeneousArray => format!(
                "{kind} (length {}, fields: {})",
                shape.length,
                shape.fields.join(", ")
            ),
            _ => format!("{kind} (length {})", shape.length),
        }
    }

    /// Functions grouped under category headings
    pub fn format_functions<'a>(
        &self,
        groups: impl IntoIterator<Item = (String, Vec<&'a FunctionMetadata>)>,
    ) -> String {
        let mut sections = Vec::new();
        for (category, functions) in groups {
            if functions.is_empty() {
                continue;
            }
            let mut lines = vec![self.paint(Color::Cyan.bold(), &category)];
            for function in functions {
                let signature = self.paint(Color::Green.normal(), &function.signature);
                if function.description.is_empty() {
                    lines.push(format!("  {signature}"));
                } else {
                    lines.push(format!("  {signature}  {}", function.description));
                }
            }
            sections.push(lines.join("\n"));
        }
        sections.join("\n\n")
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_colors {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Style used for each completion kind
pub fn kind_style(kind: CompletionKind) -> Style {
    match kind {
        CompletionKind::Field => Color::Cyan.normal(),
        CompletionKind::Index => Color::Blue.normal(),
        CompletionKind::Function => Color::Green.normal(),
        CompletionKind::Keyword => Color::Purple.normal(),
        CompletionKind::Variable => Color::Yellow.bold(),
    }
}
