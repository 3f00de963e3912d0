//! Error types for the INI filesystem core.

use thiserror::Error;

/// Malformed document text. Parsing is all-or-nothing, so any of these
/// means no document was produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: section header has no closing ']'")]
    UnterminatedSection { line: usize },

    #[error("line {line}: entry has no '=' assignment")]
    MissingAssignment { line: usize },

    #[error("line {line}: section name or key is empty")]
    EmptyName { line: usize },

    #[error("line {line}: section name or key contains '/'")]
    SeparatorInName { line: usize },
}

/// Errors reported by filesystem operations on a document.
#[derive(Error, Debug)]
pub enum IniError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("No such entry: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Directory not empty: {0}")]
    NotEmpty(String),

    #[error("Entry exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for INI filesystem operations.
pub type IniResult<T> = Result<T, IniError>;
