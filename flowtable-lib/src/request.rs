//! Paging parameters and the request builder seam.

use serde::Deserialize;
use serde::Serialize;

use crate::error::BoxError;

/// Generic paging parameters handed to a [`RequestBuilder`].
///
/// The loader fills in only the fields relevant to its pagination mode:
/// cursor requests carry `cursor` and `size`, offset and page requests carry
/// `page_index` and `size`. Unused fields keep their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Continuation token, empty when no cursor is known yet.
    pub cursor: String,
    /// 1-based page index for offset and page requests, `0` otherwise.
    pub page_index: usize,
    /// Number of items to request.
    pub size: usize,
    /// Free-text search term forwarded from the loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl PageParams {
    /// Creates parameters for a cursor request.
    pub fn cursor(cursor: impl Into<String>, size: usize) -> Self {
        Self {
            cursor: cursor.into(),
            size,
            ..Default::default()
        }
    }

    /// Creates parameters for an offset or page request.
    pub fn page(page_index: usize, size: usize) -> Self {
        Self {
            page_index,
            size,
            ..Default::default()
        }
    }

    /// Sets the search term.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Returns `true` if these parameters continue from a known cursor.
    pub fn has_cursor(&self) -> bool {
        !self.cursor.is_empty()
    }
}

/// Adapter from generic [`PageParams`] to the caller's own request type.
///
/// Implemented for any `Fn(PageParams) -> Result<R, BoxError>` closure.
///
/// # Example
///
/// ```
/// use flowtable_lib::error::BoxError;
/// use flowtable_lib::request::{PageParams, RequestBuilder};
///
/// struct UserQuery {
///     after: Option<String>,
///     limit: usize,
/// }
///
/// let builder = |params: PageParams| -> Result<UserQuery, BoxError> {
///     Ok(UserQuery {
///         after: params.has_cursor().then(|| params.cursor.clone()),
///         limit: params.size,
///     })
/// };
///
/// let query = builder.build(PageParams::cursor("", 11)).unwrap();
/// assert!(query.after.is_none());
/// assert_eq!(query.limit, 11);
/// ```
pub trait RequestBuilder<R>: Send + Sync {
    /// Builds a request from paging parameters.
    fn build(&self, params: PageParams) -> Result<R, BoxError>;
}

impl<R, F> RequestBuilder<R> for F
where
    F: Fn(PageParams) -> Result<R, BoxError> + Send + Sync,
{
    fn build(&self, params: PageParams) -> Result<R, BoxError> {
        self(params)
    }
}

/// A request builder that passes [`PageParams`] through unchanged.
///
/// Useful when the data source accepts the generic parameters directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRequest;

impl RequestBuilder<PageParams> for IdentityRequest {
    fn build(&self, params: PageParams) -> Result<PageParams, BoxError> {
        Ok(params)
    }
}
