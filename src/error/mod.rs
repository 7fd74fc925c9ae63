//! Error handling module for celnav.
//!
//! Navigation failures are plain values: the resolver returns
//! [`NavigationError`] so callers can tell "invalid path" from "valid path,
//! absent value". The expression engine reports [`EvalError`], which the
//! navigator wraps as [`NavigationError::Evaluation`]. Everything else the
//! binary touches (config, I/O, input documents) converges on [`CelnavError`].
//!
//! # Example
//!
//! ```rust
//! use celnav::error::{NavigationError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(NavigationError::KeyNotFound { key: "name".into() })?
//! }
//!
//! assert!(lookup().is_err());
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    CelnavError, ConfigError, EvalError, EvalErrorKind, NavigationError, Result,
};
