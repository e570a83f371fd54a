use std::{fmt::Display, sync::PoisonError};

/// Custom Result type for tabledb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tabledb
///
/// Every error is local to the statement that raised it. Nothing here is
/// fatal to the process and no variant implies a partial mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Statement text does not match its expected grammar
    Syntax(String),
    /// Invalid identifier, column mismatch, type mismatch, length violation
    Validation(String),
    /// Database, table, column or backup is absent
    NotFound(String),
    /// Target already exists
    Conflict(String),
    /// Statement kind or clause outside the supported set
    Unsupported(String),
    /// Runtime failure while evaluating a statement (e.g. SUM over text)
    Execution(String),
    /// Internal error (storage, serialization, poisoned lock)
    Internal(String),
}

impl Error {
    /// Stable kind name reported to callers alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Syntax(_) => "SyntaxError",
            Error::Validation(_) => "ValidationError",
            Error::NotFound(_) => "NotFoundError",
            Error::Conflict(_) => "ConflictError",
            Error::Unsupported(_) => "UnsupportedStatementError",
            Error::Execution(_) => "ExecutionError",
            Error::Internal(_) => "InternalError",
        }
    }

    /// Human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Error::Syntax(msg)
            | Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Unsupported(msg)
            | Error::Execution(msg)
            | Error::Internal(msg) => msg,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for Error {
    fn from(value: sqlparser::parser::ParserError) -> Self {
        Error::Syntax(value.to_string())
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(value: PoisonError<T>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}
