use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the categorization engine.
///
/// Configuration errors (duplicate names, unknown cuts, late registration)
/// are fatal at setup or first use: continuing would leave the output column
/// layout undefined. `Store` wraps errors propagated unchanged from the
/// value bags and the column sink; the engine never interprets them.
#[derive(Debug)]
pub enum Error {
    /// A category with this name is already registered
    DuplicateCategory(String),
    /// Registration attempted after the first event was evaluated
    RegistrationClosed(String),
    /// A cut with this name is already registered on the category
    DuplicateCut { category: String, cut: String },
    /// A cut was marked that was never registered on the category
    UnknownCut { category: String, cut: String },
    /// Error from the column store or a value bag
    Store(evcat_types::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateCategory(name) => {
                write!(f, "Category already registered: {}", name)
            }
            Error::RegistrationClosed(name) => write!(
                f,
                "Cannot register category {}: events have already been processed",
                name
            ),
            Error::DuplicateCut { category, cut } => {
                write!(f, "Cut {} already registered on category {}", cut, category)
            }
            Error::UnknownCut { category, cut } => {
                write!(f, "Cut {} never registered on category {}", cut, category)
            }
            Error::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<evcat_types::Error> for Error {
    fn from(err: evcat_types::Error) -> Self {
        Error::Store(err)
    }
}
