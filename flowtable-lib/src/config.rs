//! Loader configuration

use serde::Deserialize;
use serde::Serialize;

use crate::loader::PaginationMode;
use crate::viewport::Viewport;

/// Default number of items per page when no viewport is measured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for a [`PagedDataLoader`](crate::PagedDataLoader).
///
/// Holds the plain-data settings; collaborators (data source, request
/// builder, cursor projection) are supplied separately to the builder.
///
/// # Example
///
/// ```
/// use flowtable_lib::config::LoaderConfig;
/// use flowtable_lib::loader::PaginationMode;
/// use flowtable_lib::viewport::Viewport;
///
/// let config = LoaderConfig::default()
///     .with_mode(PaginationMode::Cursor)
///     .with_viewport(Viewport::new(628));
///
/// assert_eq!(config.effective_page_size(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Pagination strategy.
    ///
    /// Default: offset
    pub mode: PaginationMode,

    /// Items per page, used when no viewport is set.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Container measurements; when set, the page size is derived from them.
    pub viewport: Option<Viewport>,

    /// Initial search term.
    pub search: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            mode: PaginationMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            viewport: None,
            search: None,
        }
    }
}

impl LoaderConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pagination mode.
    pub fn with_mode(mut self, mode: PaginationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the viewport the page size is derived from.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Sets the initial search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns the page size the loader will use, never less than one.
    pub fn effective_page_size(&self) -> usize {
        match self.viewport {
            Some(viewport) => viewport.row_count(),
            None => self.page_size.max(1),
        }
    }
}
