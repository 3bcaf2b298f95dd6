//! Configuration error types

/// Errors raised when building a loader with missing collaborators.
///
/// These are fatal: a loader is never constructed with silently substituted
/// defaults for its data source or request builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// No data source was supplied.
    #[error("Missing data source")]
    MissingDataSource,

    /// No request builder was supplied.
    #[error("Missing request builder")]
    MissingRequestBuilder,

    /// Cursor pagination was selected without an item-to-cursor projection.
    #[error("Cursor pagination requires an item-to-cursor projection")]
    MissingCursorProjection,

    /// A pagination mode name could not be parsed.
    #[error("Unknown pagination mode: {0}")]
    UnknownMode(String),
}
