//! Fetch error types

use super::BoxError;

/// Errors that can occur while fetching a page of items.
///
/// A failed fetch never mutates the loader: its items, cursor and page
/// counters stay as they were before the call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The data source rejected the request.
    #[error("Data source error: {0}")]
    Source(#[source] BoxError),

    /// The request builder could not turn paging parameters into a request.
    #[error("Request build error: {0}")]
    Request(#[source] BoxError),

    /// A page-mode response carried no item collection.
    #[error("Response for page {page} has no items")]
    MissingItems {
        /// The page that was requested.
        page: usize,
    },
}

impl FetchError {
    /// Creates a data source error from any error type.
    pub fn data_source(err: impl Into<BoxError>) -> Self {
        Self::Source(err.into())
    }

    /// Creates a request build error from any error type.
    pub fn request(err: impl Into<BoxError>) -> Self {
        Self::Request(err.into())
    }

    /// Returns `true` if a page-mode response had no items.
    pub fn is_missing_items(&self) -> bool {
        matches!(self, Self::MissingItems { .. })
    }
}
