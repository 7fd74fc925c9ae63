//! Configuration management for celnav
//!
//! Configuration is read from a TOML file and can be overridden by
//! environment variables and command-line flags.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`CELNAV_LOG_LEVEL`, `CELNAV_NO_COLOR`)
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "CELNAV_LOG_LEVEL";

/// Environment variable disabling colored output when set to anything but
/// `0` or `false`
pub const ENV_NO_COLOR: &str = "CELNAV_NO_COLOR";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Completion scoring and limits
    #[serde(default)]
    pub completion: CompletionConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,

    /// Table border style
    #[serde(default = "default_table_style")]
    pub table_style: TableStyle,

    /// Maximum width of a table column before wrapping
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,

    /// Columns shown first when rendering record arrays as tables
    #[serde(default = "default_preferred_columns")]
    pub preferred_columns: Vec<String>,
}

/// Available table styles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Box-drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Rounded corners
    Rounded,
    /// Markdown table
    Markdown,
    /// Psql style
    Psql,
}

/// Completion scoring weights and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Flat score of field and index candidates
    #[serde(default = "default_field_score")]
    pub field_score: u32,

    /// Base score of function candidates
    #[serde(default = "default_function_score")]
    pub function_score: u32,

    /// Added to a function's score per matched prefix character
    #[serde(default = "default_match_weight")]
    pub match_weight: u32,

    /// Score of `true`/`false`/`null` candidates
    #[serde(default = "default_keyword_score")]
    pub keyword_score: u32,

    /// Score of the root marker offered for empty input
    #[serde(default = "default_variable_score")]
    pub variable_score: u32,

    /// Maximum number of index candidates offered for a sequence
    #[serde(default = "default_max_index_candidates")]
    pub max_index_candidates: usize,

    /// Maximum number of completions returned; 0 means unlimited
    #[serde(default)]
    pub max_results: usize,
}

/// Interactive history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_color_output() -> bool {
    true
}

fn default_table_style() -> TableStyle {
    TableStyle::Modern
}

fn default_max_column_width() -> usize {
    40
}

fn default_preferred_columns() -> Vec<String> {
    ["id", "name", "title"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_field_score() -> u32 {
    1000
}

fn default_function_score() -> u32 {
    100
}

fn default_match_weight() -> u32 {
    10
}

fn default_keyword_score() -> u32 {
    50
}

fn default_variable_score() -> u32 {
    500
}

fn default_max_index_candidates() -> usize {
    50
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".celnav_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: default_color_output(),
            table_style: default_table_style(),
            max_column_width: default_max_column_width(),
            preferred_columns: default_preferred_columns(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            field_score: default_field_score(),
            function_score: default_function_score(),
            match_weight: default_match_weight(),
            keyword_score: default_keyword_score(),
            variable_score: default_variable_score(),
            max_index_candidates: default_max_index_candidates(),
            max_results: 0,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration with proper precedence.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise the built-in defaults. Environment overrides are
    /// applied last and the result is validated.
    ///
    /// # Arguments
    /// * `path` - Optional explicit configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Merged configuration or error
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!("no configuration file, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CELNAV_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(ENV_LOG_LEVEL).ok().as_deref(),
            std::env::var(ENV_NO_COLOR).ok().as_deref(),
        )
    }

    fn apply_overrides(&mut self, log_level: Option<&str>, no_color: Option<&str>) -> Result<()> {
        if let Some(level) = log_level {
            self.logging.level = LogLevel::parse(level).ok_or_else(|| ConfigError::InvalidValue {
                field: ENV_LOG_LEVEL.to_string(),
                value: level.to_string(),
            })?;
        }
        if let Some(flag) = no_color {
            let flag = flag.trim().to_ascii_lowercase();
            if flag != "0" && flag != "false" {
                self.display.color_output = false;
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("celnav")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: String| -> Result<()> {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value,
            }
            .into())
        };

        if self.display.max_column_width < 4 {
            return invalid(
                "display.max_column_width",
                self.display.max_column_width.to_string(),
            );
        }
        if self.completion.field_score <= self.completion.function_score {
            return invalid(
                "completion.field_score",
                self.completion.field_score.to_string(),
            );
        }
        if self.completion.keyword_score >= self.completion.function_score {
            return invalid(
                "completion.keyword_score",
                self.completion.keyword_score.to_string(),
            );
        }
        if self.history.max_size == 0 && self.history.persist {
            return invalid("history.max_size", "0".to_string());
        }
        Ok(())
    }
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CelnavError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.display.color_output);
        assert_eq!(config.display.table_style, TableStyle::Modern);
        assert_eq!(config.completion.field_score, 1000);
        assert_eq!(config.completion.max_results, 0);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [display]
            table_style = "psql"

            [completion]
            max_results = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.display.table_style, TableStyle::Psql);
        assert_eq!(config.display.max_column_width, 40);
        assert_eq!(config.completion.max_results, 20);
        assert_eq!(config.completion.match_weight, 10);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[display\ncolor_output = 1").unwrap_err();
        assert!(matches!(
            err,
            CelnavError::Config(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_scores() {
        let mut config = Config::default();
        config.completion.field_score = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("TRACE"), Some("1")).unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(!config.display.color_output);

        let mut config = Config::default();
        config.apply_overrides(None, Some("false")).unwrap();
        assert!(config.display.color_output);

        assert!(config.apply_overrides(Some("loud"), None).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("celnav-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let mut config = Config::default();
        config.display.preferred_columns = vec!["sku".to_string()];
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(
            err,
            CelnavError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
    }
}
