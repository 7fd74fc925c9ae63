//! Completion for paths and expressions
//!
//! The system tolerates syntactically incomplete input. It works in four
//! steps:
//!
//! - **Split**: separate the base expression from the token being typed,
//!   probing the active engine's parser first and falling back to lexical
//!   segmentation
//! - **Resolve**: evaluate the base against live data (or accept a declared
//!   type when that fails)
//! - **Candidates**: fields and indices from the resolved value, functions
//!   from the registry filtered by type, literal keywords
//! - **Rank**: score, then sort by score and display text
//!
//! # Examples
//!
//! ```
//! use celnav::completion::{CompletionContext, CompletionEngine};
//! use celnav::session::Session;
//! use celnav::value::Value;
//!
//! let root = Value::from(serde_json::json!({"users": [], "uptime": 3}));
//! let engine = CompletionEngine::new(Session::default());
//!
//! let completions = engine.filter_completions("_.us", &CompletionContext::new(&root));
//! assert_eq!(completions[0].text, "_.users");
//! ```

mod candidates;
mod context;
mod engine;
mod split;

pub use candidates::{Completion, CompletionKind, compatible_functions, is_compatible};
pub use context::CompletionContext;
pub use engine::CompletionEngine;
pub use split::{SplitInput, split_input};
