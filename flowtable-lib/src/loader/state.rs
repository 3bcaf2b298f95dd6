//! Mutable loader state.

use std::hash::Hash;

use crate::items::ItemSet;
use crate::loader::PaginationMode;
use crate::request::PageParams;
use crate::status::LoaderStatus;

/// Everything a loader mutates, apart from the loading flag.
///
/// Only touched while the loader's loading flag is held, so a fetch plan
/// computed from it stays valid until its results are applied.
#[derive(Debug)]
pub(crate) struct LoaderState<T> {
    pub(crate) items: ItemSet<T>,
    pub(crate) cursor: Option<String>,
    pub(crate) current_page: usize,
    pub(crate) page_size: usize,
    pub(crate) total_pages: usize,
    pub(crate) is_first_load: bool,
    pub(crate) has_more_data: bool,
    pub(crate) is_empty: bool,
    pub(crate) search: Option<String>,
}

impl<T: Eq + Hash> LoaderState<T> {
    pub(crate) fn new(page_size: usize, search: Option<String>) -> Self {
        Self {
            items: ItemSet::new(),
            cursor: None,
            current_page: 1,
            page_size: page_size.max(1),
            total_pages: 0,
            is_first_load: true,
            has_more_data: false,
            is_empty: true,
            search,
        }
    }

    /// Clears accumulated items and paging position ahead of a fresh load.
    pub(crate) fn reset_paging(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.current_page = 1;
        self.has_more_data = false;
    }

    /// Marks the loader as loading from scratch, returning the flags it had.
    pub(crate) fn begin_reload(&mut self) -> ReloadFlags {
        let prior = ReloadFlags {
            is_first_load: self.is_first_load,
            has_more_data: self.has_more_data,
        };
        self.is_first_load = true;
        self.has_more_data = false;
        prior
    }

    pub(crate) fn restore(&mut self, flags: ReloadFlags) {
        self.is_first_load = flags.is_first_load;
        self.has_more_data = flags.has_more_data;
    }

    pub(crate) fn refresh_empty(&mut self) {
        self.is_empty = self.items.is_empty();
    }

    pub(crate) fn params(&self, params: PageParams) -> PageParams {
        params.with_search(self.search.clone())
    }

    pub(crate) fn status(&self, mode: PaginationMode, is_loading: bool) -> LoaderStatus {
        LoaderStatus {
            mode,
            is_loading,
            is_first_load: self.is_first_load,
            has_more_data: self.has_more_data,
            is_empty: self.is_empty,
            len: self.items.len(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// A fetch decided under the state lock and executed outside it.
#[derive(Debug, Clone)]
pub(crate) struct FetchPlan {
    /// Parameters handed to the request builder.
    pub(crate) params: PageParams,
    /// Page to record once the fetch succeeds.
    pub(crate) page: usize,
    /// Visible page size the results are measured against.
    pub(crate) page_size: usize,
    /// Clear items and paging position before applying results.
    pub(crate) reset: bool,
}

/// Flags overwritten when a reload starts, restored if it does not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReloadFlags {
    is_first_load: bool,
    has_more_data: bool,
}
