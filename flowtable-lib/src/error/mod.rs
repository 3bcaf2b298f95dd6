//! Error types

mod config;
mod fetch;

pub use config::*;
pub use fetch::*;

/// Boxed error produced by caller-supplied collaborators (data sources and
/// request builders).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error returned by loader operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The loader was built with missing or invalid collaborators.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A fetch (or the request building that precedes it) failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl Error {
    /// Returns `true` if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` if this is a fetch error.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Returns the fetch error, if this is one.
    pub fn as_fetch(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Configuration(_) => None,
        }
    }
}
