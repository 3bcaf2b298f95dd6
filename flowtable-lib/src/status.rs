//! Observable loader status.

use serde::Serialize;

use crate::loader::PaginationMode;

/// A point-in-time snapshot of a loader's flags and counters.
///
/// The render surface either polls [`PagedDataLoader::status`] or watches the
/// receiver returned by [`PagedDataLoader::subscribe`], which is updated after
/// every state change.
///
/// [`PagedDataLoader::status`]: crate::PagedDataLoader::status
/// [`PagedDataLoader::subscribe`]: crate::PagedDataLoader::subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoaderStatus {
    /// Pagination strategy.
    pub mode: PaginationMode,
    /// A fetch is in flight.
    pub is_loading: bool,
    /// No load has completed since construction or the last reload.
    pub is_first_load: bool,
    /// A further `show_more` is expected to yield items (offset/cursor).
    pub has_more_data: bool,
    /// No items are loaded.
    pub is_empty: bool,
    /// Number of loaded items.
    pub len: usize,
    /// Current 1-based page.
    pub current_page: usize,
    /// Items requested per page.
    pub page_size: usize,
    /// Total pages reported by the source (page mode), `0` if unknown.
    pub total_pages: usize,
}

impl LoaderStatus {
    pub(crate) fn initial(mode: PaginationMode, page_size: usize) -> Self {
        Self {
            mode,
            is_loading: false,
            is_first_load: true,
            has_more_data: false,
            is_empty: true,
            len: 0,
            current_page: 1,
            page_size,
            total_pages: 0,
        }
    }

    /// Returns `true` if page mode knows of a page after the current one.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Returns `true` if page mode is past the first page.
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Returns `true` if the render surface should show a loading
    /// placeholder instead of rows.
    pub fn shows_placeholder(&self) -> bool {
        self.is_loading && self.is_first_load
    }
}
