//! JSON rendering of values
//!
//! - Pretty-printed and compact output
//! - Optional color highlighting (pretty output only)

use colored_json::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::value::Value;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Indentation width
    indent: usize,

    /// Enable colored output
    use_colors: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    /// * `use_colors` - Enable colored output
    /// * `indent` - Indentation width for pretty output
    pub fn new(pretty: bool, use_colors: bool, indent: usize) -> Self {
        Self {
            pretty,
            indent,
            use_colors,
        }
    }

    /// Format a value as JSON
    ///
    /// # Arguments
    /// * `value` - Value to format
    ///
    /// # Returns
    /// * `Result<String>` - JSON string or error
    pub fn format(&self, value: &Value) -> Result<String> {
        let json = value.to_json();
        let json_str = if self.pretty {
            self.to_pretty_string(&json)?
        } else {
            serde_json::to_string(&json)?
        };

        // compact output stays plain for piping
        if self.use_colors && self.pretty {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }

    fn to_pretty_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true, false, 2)
    }
}
