use std::fmt;

/// Result type for evcat-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// No value registered under the requested key
    MissingValue(String),
    /// A value exists but does not deserialize as the requested type
    InvalidValue {
        key: String,
        source: serde_json::Error,
    },
    /// A column key was declared twice
    DuplicateColumn(String),
    /// A write targeted a column that was never declared
    UnknownColumn(String),
    /// Wrapped error from a lower layer
    Internal(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingValue(key) => write!(f, "No value for key: {}", key),
            Error::InvalidValue { key, source } => {
                write!(f, "Invalid value for key {}: {}", key, source)
            }
            Error::DuplicateColumn(key) => write!(f, "Column already declared: {}", key),
            Error::UnknownColumn(key) => write!(f, "Column never declared: {}", key),
            Error::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidValue { source, .. } => Some(source),
            Error::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err)
    }
}
