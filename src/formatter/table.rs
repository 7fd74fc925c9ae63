//! Table formatting for arrays of records using tabled
//!
//! Only homogeneous arrays (every element a record with the same keys) are
//! rendered as tables; the projection comes from
//! [`extract_columnar_data`](crate::shape::extract_columnar_data).

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::config::{DisplayConfig, TableStyle};
use crate::shape::extract_columnar_data;
use crate::value::Value;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for record arrays
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,

    /// Columns placed first when present
    preferred_columns: Vec<String>,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
            use_colors: false,
            preferred_columns: Vec::new(),
        }
    }

    /// Create a table formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            max_column_width: config.max_column_width,
            style: config.table_style,
            use_colors: config.color_output,
            preferred_columns: config.preferred_columns.clone(),
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    pub fn with_preferred_columns(mut self, columns: Vec<String>) -> Self {
        self.preferred_columns = columns;
        self
    }

    /// Render `value` as a table.
    ///
    /// # Arguments
    /// * `value` - Value to render
    ///
    /// # Returns
    /// * `Option<String>` - Table text, or `None` when the value is not a
    ///   homogeneous array of records
    pub fn format(&self, value: &Value) -> Option<String> {
        let data = extract_columnar_data(value, &self.preferred_columns)?;

        let mut builder = Builder::default();
        builder.push_record(data.columns.clone());
        for row in data.rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // wrap long values instead of truncating
        for i in 0..data.columns.len() {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        Some(table.to_string())
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Markdown => table.with(Style::markdown()),
            TableStyle::Psql => table.with(Style::psql()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Value {
        Value::from(json!([
            {"name": "Ada", "id": 1},
            {"name": "Bob", "id": 2}
        ]))
    }

    #[test]
    fn test_homogeneous_array_renders() {
        let output = TableFormatter::new()
            .with_style(TableStyle::Ascii)
            .format(&people())
            .unwrap();
        assert!(output.contains("Ada"));
        assert!(output.contains("Bob"));
        assert!(output.contains('+'));
    }

    #[test]
    fn test_preferred_columns_first() {
        let output = TableFormatter::new()
            .with_style(TableStyle::Markdown)
            .with_preferred_columns(vec!["name".to_string()])
            .format(&people())
            .unwrap();
        let header = output.lines().next().unwrap();
        assert!(header.find("name").unwrap() < header.find("id").unwrap());
    }

    #[test]
    fn test_non_tabular_values() {
        let formatter = TableFormatter::new();
        assert!(formatter.format(&Value::from(json!([1, 2]))).is_none());
        assert!(formatter.format(&Value::from(json!({"a": 1}))).is_none());
        assert!(formatter
            .format(&Value::from(json!([{"a": 1}, {"b": 2}])))
            .is_none());
    }

    #[test]
    fn test_long_values_wrap() {
        let value = Value::from(json!([{"text": "x".repeat(30)}]));
        let output = TableFormatter::new()
            .with_max_column_width(10)
            .format(&value)
            .unwrap();
        assert!(output.lines().count() > 5);
    }
}
