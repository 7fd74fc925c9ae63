//! celnav library
//!
//! Resolves dotted/bracketed paths and expressions against nested values and
//! completes them while they are still being typed.
//!
//! # Modules
//!
//! - `path`: Path tokenizing and simple/complex classification
//! - `navigator`: Path resolution by structural walk or engine delegation
//! - `shape`: Structural classification of values
//! - `registry`: Deduplicated, categorized function metadata
//! - `completion`: Context-aware completion of partial input
//! - `engine`: Expression engine trait and the built-in engine
//! - `session`: Shared, swappable engine and registry
//! - `value`: The value model and JSON conversion
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: JSON and table output
//! - `cli`: Command-line interface
//! - `repl`: Interactive document browser
//!
//! # Example
//!
//! ```
//! use celnav::{Session, Value};
//!
//! let root = Value::from(serde_json::json!({"items": [{"id": 1}, {"id": 2}]}));
//! let session = Session::default();
//!
//! assert_eq!(session.resolve(&root, "items.0.id").unwrap(), Value::Int(1));
//! assert_eq!(session.resolve(&root, "size(_.items)").unwrap(), Value::Int(2));
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod navigator;
pub mod path;
pub mod registry;
pub mod repl;
pub mod session;
pub mod shape;
pub mod value;

// Re-export commonly used types
pub use completion::{Completion, CompletionContext, CompletionEngine, CompletionKind};
pub use config::Config;
pub use engine::{BuiltinEngine, ExpressionEngine};
pub use error::{CelnavError, NavigationError, Result};
pub use navigator::Navigator;
pub use registry::{FunctionMetadata, FunctionRegistry};
pub use session::Session;
pub use shape::{Shape, ShapeKind, detect_shape};
pub use value::{Value, ValueType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
