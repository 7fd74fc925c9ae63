//! Command-line interface for celnav
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and CLI overrides
//! - Loading input documents (JSON files or stdin)
//! - Dispatching one-shot subcommands and the interactive browser

pub mod completion;

use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::completion::{Completion, CompletionContext, CompletionEngine};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::formatter::Formatter;
use crate::path::is_root;
use crate::registry::FunctionMetadata;
use crate::repl::Browser;
use crate::session::Session;
use crate::shape::detect_shape;
use crate::value::{Value, ValueType};

/// Path that makes input documents come from stdin
const STDIN_PATH: &str = "-";

/// celnav - navigate and complete paths over JSON data
#[derive(Parser, Debug)]
#[command(
    name = "celnav",
    version,
    about = "Navigate JSON documents with paths and expressions",
    long_about = "Resolve dotted/bracketed paths and expressions against JSON documents,
with context-aware completion and an interactive browser."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for celnav
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a path or expression and print the result
    Get {
        /// JSON document ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path or expression, e.g. `_.items[0].name`
        #[arg(value_name = "PATH")]
        path: String,

        /// Render homogeneous record arrays as a table
        #[arg(long)]
        table: bool,
    },

    /// List completions for partial input
    Complete {
        /// JSON document ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input typed so far
        #[arg(value_name = "INPUT", allow_hyphen_values = true)]
        input: String,

        /// Override the partial token
        #[arg(long, value_name = "TOKEN")]
        partial: Option<String>,

        /// Declared type of the base when it cannot be resolved
        #[arg(long = "type", value_name = "TYPE")]
        declared_type: Option<String>,

        /// Print completions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the shape of a value
    Shape {
        /// JSON document ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to inspect (defaults to the root)
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },

    /// List available functions by category
    Functions {
        /// Filter by name or description
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Only functions called as methods
        #[arg(long, conflicts_with = "globals")]
        methods: bool,

        /// Only functions called globally
        #[arg(long)]
        globals: bool,
    },

    /// Browse a document interactively
    Browse {
        /// JSON document
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = match Config::load(args.config_file.as_deref()) {
            Ok(config) => config,
            // an explicitly named file must load
            Err(e) if args.config_file.is_some() => return Err(e),
            Err(e) => {
                eprintln!("Warning: Configuration could not be loaded: {}", e);
                eprintln!("Using default configuration instead.");
                Config::default()
            }
        };

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if args.no_color {
            config.display.color_output = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Run the selected subcommand
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn run(&self) -> Result<()> {
        let session = Session::default();

        match &self.args.command {
            Commands::Get { file, path, table } => {
                let root = read_document(file)?;
                let value = session.resolve(&root, path)?;
                println!("{}", self.formatter().format_value(&value, *table)?);
            }
            Commands::Complete {
                file,
                input,
                partial,
                declared_type,
                json,
            } => {
                let root = read_document(file)?;
                let completions =
                    self.complete(&session, &root, input, partial.as_deref(), declared_type.as_deref());
                if *json {
                    println!("{}", completions_to_json(&completions)?);
                } else if !completions.is_empty() {
                    println!("{}", self.formatter().format_completions(&completions));
                }
            }
            Commands::Shape { file, path } => {
                let root = read_document(file)?;
                let value = match path.as_deref() {
                    Some(path) if !is_root(path) => session.resolve(&root, path)?,
                    _ => root,
                };
                println!("{}", self.formatter().format_shape(&detect_shape(&value)));
            }
            Commands::Functions {
                query,
                methods,
                globals,
            } => {
                println!(
                    "{}",
                    self.list_functions(&session, query.as_deref(), *methods, *globals)
                );
            }
            Commands::Browse { file } => {
                let root = read_document(file)?;
                let label = file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut browser = Browser::new(session, root, self.config.clone(), &label)?;
                browser.run()?;
            }
            Commands::Completion { shell } => {
                completion::generate_completion(shell)?;
            }
            Commands::Config { show, validate } => {
                self.handle_config_command(*show, *validate)?;
            }
        }

        Ok(())
    }

    fn formatter(&self) -> Formatter {
        Formatter::from_config(&self.config.display)
    }

    fn complete(
        &self,
        session: &Session,
        root: &Value,
        input: &str,
        partial: Option<&str>,
        declared_type: Option<&str>,
    ) -> Vec<Completion> {
        let engine = CompletionEngine::with_config(session.clone(), self.config.completion.clone());

        let mut ctx = CompletionContext::new(root);
        if let Some(partial) = partial {
            ctx = ctx.with_partial(partial);
        }
        if let Some(declared) = declared_type {
            ctx = ctx.with_current_type(ValueType::parse(declared));
        }
        debug!(input, "completing from command line");
        engine.filter_completions(input, &ctx)
    }

    fn list_functions(
        &self,
        session: &Session,
        query: Option<&str>,
        methods: bool,
        globals: bool,
    ) -> String {
        let registry = session.registry();
        let matching: HashSet<&str> = registry
            .search(query.unwrap_or(""))
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();

        let keep = |f: &FunctionMetadata| {
            matching.contains(f.name.as_str())
                && (!methods || f.is_method)
                && (!globals || !f.is_method)
        };

        let groups = registry
            .categories()
            .into_iter()
            .map(|(category, functions)| {
                let functions: Vec<&FunctionMetadata> =
                    functions.into_iter().filter(|f| keep(*f)).collect();
                (category, functions)
            })
            .collect::<Vec<_>>();

        self.formatter().format_functions(groups)
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("# Configuration file: {}", path.display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}

/// Read a JSON document from a file, or from stdin when the path is `-`
///
/// # Arguments
/// * `path` - File path or `-`
///
/// # Returns
/// * `Result<Value>` - Parsed document or error
pub fn read_document(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    parse_document(&content)
}

/// Parse JSON text into a value
pub fn parse_document(content: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(content)?;
    Ok(Value::from(json))
}

fn completions_to_json(completions: &[Completion]) -> Result<String> {
    let items: Vec<serde_json::Value> = completions
        .iter()
        .map(|c| {
            serde_json::json!({
                "text": c.text,
                "display": c.display,
                "kind": c.kind.to_string(),
                "detail": c.detail,
                "description": c.description,
                "score": c.score,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CelnavError;

    #[test]
    fn test_cli_args_get() {
        let args = CliArgs::try_parse_from(vec!["celnav", "get", "data.json", "_.items[0]"]).unwrap();
        match args.command {
            Commands::Get { file, path, table } => {
                assert_eq!(file, PathBuf::from("data.json"));
                assert_eq!(path, "_.items[0]");
                assert!(!table);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_args_global_flags() {
        let args =
            CliArgs::try_parse_from(vec!["celnav", "shape", "-", "--no-color", "-v"]).unwrap();
        assert!(args.no_color);
        assert!(args.verbose);
        assert!(!args.very_verbose);
    }

    #[test]
    fn test_cli_args_complete() {
        let args = CliArgs::try_parse_from(vec![
            "celnav", "complete", "data.json", "_.u", "--type", "map", "--json",
        ])
        .unwrap();
        match args.command {
            Commands::Complete {
                input,
                declared_type,
                json,
                partial,
                ..
            } => {
                assert_eq!(input, "_.u");
                assert_eq!(declared_type.as_deref(), Some("map"));
                assert!(json);
                assert!(partial.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_functions_flags_conflict() {
        assert!(CliArgs::try_parse_from(vec!["celnav", "functions", "--methods", "--globals"]).is_err());
    }

    #[test]
    fn test_apply_args_to_config() {
        let args = CliArgs::try_parse_from(vec!["celnav", "--vv", "--no-color", "functions"]).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(!config.display.color_output);
    }

    #[test]
    fn test_parse_document() {
        let value = parse_document(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(value.len(), 1);
        assert!(matches!(parse_document("{"), Err(CelnavError::Json(_))));
    }

    #[test]
    fn test_complete_with_declared_type() {
        let args = CliArgs::try_parse_from(vec!["celnav", "--no-color", "functions"]).unwrap();
        let cli = CliInterface {
            args,
            config: Config::default(),
        };
        let session = Session::default();
        let root = parse_document(r#"{"users": [], "uptime": 3}"#).unwrap();

        let completions = cli.complete(&session, &root, "_.u", None, None);
        assert_eq!(completions[0].text, "_.uptime");

        let completions = cli.complete(&session, &root, "missing.", None, Some("string"));
        assert!(completions.iter().any(|c| c.display == "size"));
    }

    #[test]
    fn test_list_functions_filters() {
        let args = CliArgs::try_parse_from(vec!["celnav", "--no-color", "functions"]).unwrap();
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, &args);
        let cli = CliInterface { args, config };
        let session = Session::default();

        let methods = cli.list_functions(&session, Some("upper"), true, false);
        assert!(methods.contains("upperAscii"));
        assert!(!methods.contains("lowerAscii"));

        let globals = cli.list_functions(&session, Some("upper"), false, true);
        assert!(globals.is_empty());
    }
}
