//! Builder for [`PagedDataLoader`].

use std::hash::Hash;
use std::sync::Arc;

use super::CursorFn;
use super::PagedDataLoader;
use super::PaginationMode;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::config::LoaderConfig;
use crate::error::ConfigurationError;
use crate::request::RequestBuilder;
use crate::source::DataSource;
use crate::viewport::Viewport;

/// Builder for constructing a [`PagedDataLoader`].
///
/// Collaborators are checked when [`build`](Self::build) is called rather
/// than at compile time, so a loader can be assembled from optional
/// configuration.
///
/// # Required
///
/// - `data_source` - where items are fetched from
/// - `request_builder` - how paging parameters become requests
/// - `item_to_cursor` - only for [`PaginationMode::Cursor`]
///
/// # Example
///
/// ```
/// use flowtable_lib::loader::{PagedDataLoader, PaginationMode};
/// use flowtable_lib::request::IdentityRequest;
/// use flowtable_lib::source::StaticSource;
/// use flowtable_lib::viewport::Viewport;
///
/// let rows: Vec<u32> = (1..=100).collect();
/// let loader = PagedDataLoader::builder()
///     .mode(PaginationMode::Cursor)
///     .viewport(Viewport::new(628))
///     .data_source(
///         StaticSource::new(rows, PaginationMode::Cursor).with_cursor(|n| Some(n.to_string())),
///     )
///     .request_builder(IdentityRequest)
///     .item_to_cursor(|n| Some(n.to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(loader.page_size(), 10);
/// ```
pub struct PagedDataLoaderBuilder<T, R> {
    mode: PaginationMode,
    page_size: usize,
    viewport: Option<Viewport>,
    search: Option<String>,
    source: Option<Arc<dyn DataSource<R, T>>>,
    request_builder: Option<Arc<dyn RequestBuilder<R>>>,
    cursor_fn: Option<CursorFn<T>>,
}

impl<T, R> PagedDataLoaderBuilder<T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            mode: PaginationMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            viewport: None,
            search: None,
            source: None,
            request_builder: None,
            cursor_fn: None,
        }
    }

    /// Applies every setting from a [`LoaderConfig`].
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.mode = config.mode;
        self.page_size = config.page_size;
        self.viewport = config.viewport;
        self.search = config.search;
        self
    }

    /// Sets the pagination mode.
    ///
    /// Defaults to [`PaginationMode::Offset`].
    pub fn mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the page size. Values below 1 are raised to 1.
    ///
    /// Ignored when a viewport is set.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Derives the page size from the container the table renders into.
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Sets the initial search term.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the data source.
    pub fn data_source<S>(mut self, source: S) -> Self
    where
        S: DataSource<R, T> + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets a data source that is shared with the caller.
    pub fn shared_data_source(mut self, source: Arc<dyn DataSource<R, T>>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the request builder.
    pub fn request_builder<B>(mut self, builder: B) -> Self
    where
        B: RequestBuilder<R> + 'static,
    {
        self.request_builder = Some(Arc::new(builder));
        self
    }

    /// Sets the projection from an item to the cursor continuing after it.
    pub fn item_to_cursor<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.cursor_fn = Some(Arc::new(f));
        self
    }

    /// Builds the [`PagedDataLoader`].
    ///
    /// Fails if the data source or request builder is missing, or if cursor
    /// mode was chosen without a cursor projection.
    pub fn build(self) -> Result<PagedDataLoader<T, R>, ConfigurationError> {
        let source = self.source.ok_or(ConfigurationError::MissingDataSource)?;
        let request_builder = self
            .request_builder
            .ok_or(ConfigurationError::MissingRequestBuilder)?;

        if self.mode == PaginationMode::Cursor && self.cursor_fn.is_none() {
            return Err(ConfigurationError::MissingCursorProjection);
        }

        let page_size = match self.viewport {
            Some(viewport) => viewport.row_count(),
            None => self.page_size.max(1),
        };

        log::debug!("Building {} loader with page size {}", self.mode, page_size);

        Ok(PagedDataLoader::from_parts(
            self.mode,
            source,
            request_builder,
            self.cursor_fn,
            page_size,
            self.search.filter(|s| !s.is_empty()),
        ))
    }
}

impl<T, R> Default for PagedDataLoaderBuilder<T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
