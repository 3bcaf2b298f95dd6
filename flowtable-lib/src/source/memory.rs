//! In-memory data source

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use super::DataSource;
use crate::error::BoxError;
use crate::loader::CursorFn;
use crate::loader::PaginationMode;
use crate::request::PageParams;
use crate::response::LoadResponse;

type SearchFn<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

/// A data source serving a fixed `Vec` of items.
///
/// Answers [`PageParams`] requests the way a typical paginated backend would:
/// - Offset: slice `page_index` of `size` items, total is the item count
/// - Cursor: up to `size` items following the item whose projection equals
///   the cursor, total is the item count
/// - Page: slice `page_index` of `size` items, total is the page count
///
/// # Example
///
/// ```
/// use flowtable_lib::loader::PaginationMode;
/// use flowtable_lib::source::StaticSource;
///
/// let source = StaticSource::new((1..=25).collect::<Vec<u32>>(), PaginationMode::Page)
///     .with_search(|item, term| item.to_string().contains(term));
///
/// assert_eq!(source.len(), 25);
/// assert_eq!(source.fetch_count(), 0);
/// ```
pub struct StaticSource<T> {
    items: Vec<T>,
    mode: PaginationMode,
    cursor_fn: Option<CursorFn<T>>,
    search_fn: Option<SearchFn<T>>,
    fetches: AtomicUsize,
}

impl<T> StaticSource<T> {
    /// Creates a source answering requests for `mode`.
    pub fn new(items: Vec<T>, mode: PaginationMode) -> Self {
        Self {
            items,
            mode,
            cursor_fn: None,
            search_fn: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Sets the projection used to locate cursors.
    ///
    /// Should match the projection given to the loader.
    pub fn with_cursor<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.cursor_fn = Some(Arc::new(f));
        self
    }

    /// Sets the predicate applied when a request carries a search term.
    pub fn with_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &str) -> bool + Send + Sync + 'static,
    {
        self.search_fn = Some(Arc::new(f));
        self
    }

    /// Returns the number of items held, before any search filter.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the source holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns how many fetches have been served.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn matching(&self, search: Option<&str>) -> Vec<&T> {
        match (search, &self.search_fn) {
            (Some(term), Some(f)) if !term.is_empty() => {
                self.items.iter().filter(|item| f(*item, term)).collect()
            }
            _ => self.items.iter().collect(),
        }
    }
}

impl<T: Clone> StaticSource<T> {
    fn page_slice(items: &[&T], page_index: usize, size: usize) -> Vec<T> {
        let start = page_index.saturating_sub(1).saturating_mul(size);
        items
            .iter()
            .skip(start)
            .take(size)
            .map(|item| (*item).clone())
            .collect()
    }

    fn after_cursor(&self, items: &[&T], cursor: &str, size: usize) -> Vec<T> {
        let start = if cursor.is_empty() {
            0
        } else {
            let Some(f) = &self.cursor_fn else {
                return Vec::new();
            };
            match items
                .iter()
                .position(|item| f(*item).as_deref() == Some(cursor))
            {
                Some(pos) => pos + 1,
                None => return Vec::new(),
            }
        };
        items
            .iter()
            .skip(start)
            .take(size)
            .map(|item| (*item).clone())
            .collect()
    }
}

impl<T> std::fmt::Debug for StaticSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSource")
            .field("len", &self.items.len())
            .field("mode", &self.mode)
            .field("fetches", &self.fetch_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> DataSource<PageParams, T> for StaticSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch(&self, request: PageParams) -> Result<LoadResponse<T>, BoxError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let matching = self.matching(request.search.as_deref());
        let response = match self.mode {
            PaginationMode::Offset => LoadResponse::new(
                Self::page_slice(&matching, request.page_index, request.size),
                matching.len(),
            ),
            PaginationMode::Cursor => LoadResponse::new(
                self.after_cursor(&matching, &request.cursor, request.size),
                matching.len(),
            ),
            PaginationMode::Page => {
                let pages = matching.len().div_ceil(request.size.max(1));
                LoadResponse::new(
                    Self::page_slice(&matching, request.page_index, request.size),
                    pages,
                )
            }
        };

        log::trace!(
            "StaticSource served {} of {} items for {:?}",
            response.len(),
            matching.len(),
            request
        );
        Ok(response)
    }
}
