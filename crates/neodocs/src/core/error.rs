//! Error types.

use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Result type for neodocs operations.
pub type Result<T> = StdResult<T, Error>;

/// Parse error marker type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// Parse error message, optionally including the offending input.
    message: String,
}

impl ParseError {
    /// Construct a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Construct a parse error that quotes the input it failed on.
    pub fn with_input(message: impl Into<String>, input: &str) -> Self {
        Self {
            message: format!("{} in {input:?}", message.into()),
        }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("not found: {0}")]
    /// Lookup of an unregistered panel, element, command or tree node.
    NotFound(String),
    #[error("duplicate: {0}")]
    /// An identifier was registered twice.
    Duplicate(String),
    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(#[source] ParseError),
    #[error("config: {0}")]
    /// Configuration could not be read or applied.
    Config(String),
    #[error("command: {0}")]
    /// A command reported a failure.
    Command(String),
    #[error("io: {0}")]
    /// I/O failure while reading input or writing output.
    Io(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl Error {
    /// Construct a not-found error for a kind of thing and its identifier.
    pub fn not_found(kind: &str, id: impl AsRef<str>) -> Self {
        Self::NotFound(format!("{kind} with ID {:?}", id.as_ref()))
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
