use std::{fmt, io};

/// Crate-wide `Result` type using [`CelnavError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, CelnavError>;

/// Top-level error type for celnav operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type for the binary and for library callers that do not care
/// which layer failed.
#[derive(Debug)]
pub enum CelnavError {
    /// Path resolution errors.
    Navigation(NavigationError),

    /// Expression engine errors outside of navigation.
    Eval(EvalError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Malformed input document.
    Json(serde_json::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Errors produced while resolving a path against a value.
///
/// These are ordinary results: callers use them to tell an invalid path apart
/// from a valid path that points at nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Map or record has no such key.
    KeyNotFound { key: String },

    /// Sequence index outside `0..len`.
    IndexOutOfRange { index: i64, len: usize },

    /// Key step on a non-map or index step on a non-sequence.
    TypeMismatch { expected: String, found: String },

    /// Attempt to descend into a scalar.
    NotNavigable { segment: String, type_name: String },

    /// Path text could not be parsed.
    InvalidSyntax(String),

    /// The expression engine rejected or failed to evaluate the input.
    Evaluation(EvalError),
}

/// Category of an expression engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// The expression could not be parsed.
    Syntax,
    /// Reference to an unbound identifier.
    UnknownIdentifier,
    /// Call to a function the engine does not know.
    UnknownFunction,
    /// Wrong number of arguments.
    Arity,
    /// Operand or argument of the wrong type.
    Type,
    /// Index out of range.
    Index,
    /// Missing map key or field.
    Key,
    /// Integer division or modulo by zero.
    DivisionByZero,
    /// Invalid regular expression.
    Regex,
}

/// Error reported by an [`ExpressionEngine`](crate::engine::ExpressionEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Syntax, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(EvalErrorKind::Type, message)
    }

    pub fn arity(function: &str, expected: &str, found: usize) -> Self {
        Self::new(
            EvalErrorKind::Arity,
            format!("{function}() expects {expected} argument(s), got {found}"),
        )
    }
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for CelnavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CelnavError::Navigation(e) => write!(f, "{e}"),
            CelnavError::Eval(e) => write!(f, "Evaluation error: {e}"),
            CelnavError::Config(e) => write!(f, "Configuration error: {e}"),
            CelnavError::Io(e) => write!(f, "I/O error: {e}"),
            CelnavError::Json(e) => write!(f, "Invalid JSON: {e}"),
            CelnavError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::KeyNotFound { key } => write!(f, "Key not found: '{key}'"),
            NavigationError::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range (length {len})")
            }
            NavigationError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected}, found {found}")
            }
            NavigationError::NotNavigable { segment, type_name } => {
                write!(f, "Cannot navigate into {type_name} with '{segment}'")
            }
            NavigationError::InvalidSyntax(msg) => write!(f, "Invalid path syntax: {msg}"),
            NavigationError::Evaluation(e) => write!(f, "Evaluation error: {e}"),
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvalErrorKind::Syntax => "syntax",
            EvalErrorKind::UnknownIdentifier => "unknown identifier",
            EvalErrorKind::UnknownFunction => "unknown function",
            EvalErrorKind::Arity => "arity",
            EvalErrorKind::Type => "type",
            EvalErrorKind::Index => "index",
            EvalErrorKind::Key => "key",
            EvalErrorKind::DivisionByZero => "division by zero",
            EvalErrorKind::Regex => "regex",
        };
        f.write_str(name)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for CelnavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CelnavError::Io(e) => Some(e),
            CelnavError::Json(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for NavigationError {}
impl std::error::Error for EvalError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to CelnavError ========================= */

impl From<io::Error> for CelnavError {
    fn from(err: io::Error) -> Self {
        CelnavError::Io(err)
    }
}

impl From<serde_json::Error> for CelnavError {
    fn from(err: serde_json::Error) -> Self {
        CelnavError::Json(err)
    }
}

impl From<NavigationError> for CelnavError {
    fn from(err: NavigationError) -> Self {
        CelnavError::Navigation(err)
    }
}

impl From<EvalError> for CelnavError {
    fn from(err: EvalError) -> Self {
        CelnavError::Eval(err)
    }
}

impl From<EvalError> for NavigationError {
    fn from(err: EvalError) -> Self {
        NavigationError::Evaluation(err)
    }
}

impl From<ConfigError> for CelnavError {
    fn from(err: ConfigError) -> Self {
        CelnavError::Config(err)
    }
}

impl From<String> for CelnavError {
    fn from(msg: String) -> Self {
        CelnavError::Generic(msg)
    }
}

impl From<&str> for CelnavError {
    fn from(msg: &str) -> Self {
        CelnavError::Generic(msg.to_owned())
    }
}
