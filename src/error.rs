use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmartPathError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SmartPathError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Why a path did not resolve to a location.
///
/// Every variant is an ordinary "not found" outcome. None of them abort a
/// caller's batch; they only explain the miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationFailure {
    #[error("Invalid path syntax in '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Predicate could not be parsed: {predicate}")]
    InvalidPredicate { predicate: String },

    #[error("Missing field '{field}' at {pointer}")]
    MissingField { field: String, pointer: String },

    #[error("Expected an object at {pointer}")]
    NotAnObject { pointer: String },

    #[error("Expected an array for '{field}' at {pointer}")]
    NotAnArray { field: String, pointer: String },

    #[error("Index {index} out of range for '{field}' (length {len}) at {pointer}")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
        pointer: String,
    },

    #[error("No element of '{field}' matches where({predicate}) at {pointer}")]
    NoPredicateMatch {
        field: String,
        predicate: String,
        pointer: String,
    },

    #[error("Root document has no entry array")]
    NotABundle,

    #[error("Entry index {index} out of range (bundle has {len} entries)")]
    EntryIndexOutOfRange { index: usize, len: usize },

    #[error("No bundle entry with resourceType '{resource_type}'")]
    NoMatchingEntry { resource_type: String },

    #[error("Bundle entry is ambiguous without an explicit index")]
    AmbiguousEntry,

    #[error("Expected resourceType '{expected}', found '{found}'")]
    ResourceTypeMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, SmartPathError>;
