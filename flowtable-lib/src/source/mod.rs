//! Data sources
//!
//! Provides the `DataSource` trait the loader fetches through, a closure
//! adapter, and an in-memory implementation used by tests and demos.

mod memory;

pub use memory::*;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::BoxError;
use crate::response::LoadResponse;

/// Trait for the caller-owned data call behind a loader.
///
/// `R` is the caller's request type, produced by a
/// [`RequestBuilder`](crate::request::RequestBuilder); `T` is the item type.
///
/// The loader performs at most one fetch at a time and never retries: any
/// retry policy belongs inside the implementation.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use flowtable_lib::error::BoxError;
/// use flowtable_lib::source::DataSource;
/// use flowtable_lib::LoadResponse;
///
/// struct UsersApi {
///     http: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl DataSource<UserQuery, User> for UsersApi {
///     async fn fetch(&self, request: UserQuery) -> Result<LoadResponse<User>, BoxError> {
///         let page: LoadResponse<User> = self
///             .http
///             .get("https://api.example.com/users")
///             .query(&request)
///             .send()
///             .await?
///             .json()
///             .await?;
///         Ok(page)
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource<R, T>: Send + Sync {
    /// Fetches one batch of items for `request`.
    ///
    /// Returning a response without an item collection is allowed; how it is
    /// treated depends on the loader's pagination mode.
    async fn fetch(&self, request: R) -> Result<LoadResponse<T>, BoxError>;
}

/// A data source backed by a closure returning a boxed future.
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use flowtable_lib::error::BoxError;
/// use flowtable_lib::request::PageParams;
/// use flowtable_lib::source::FnSource;
/// use flowtable_lib::LoadResponse;
///
/// let source = FnSource::new(|params: PageParams| {
///     async move { Ok::<_, BoxError>(LoadResponse::new(vec![params.page_index], 1)) }.boxed()
/// });
/// ```
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F> {
    /// Wraps a closure as a data source.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl<R, T, F> DataSource<R, T> for FnSource<F>
where
    R: Send + 'static,
    T: Send + 'static,
    F: Fn(R) -> BoxFuture<'static, Result<LoadResponse<T>, BoxError>> + Send + Sync,
{
    async fn fetch(&self, request: R) -> Result<LoadResponse<T>, BoxError> {
        (self.f)(request).await
    }
}
