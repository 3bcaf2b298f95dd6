//! Paged data loader.
//!
//! [`PagedDataLoader`] drives incremental (offset, cursor) or page-based
//! retrieval of a homogeneous item collection for a table, exposing the
//! loaded items plus loading and availability flags.
//!
//! # Modes
//!
//! - [`PaginationMode::Offset`] - page-index requests, results accumulate
//! - [`PaginationMode::Cursor`] - continuation-token requests, results accumulate
//! - [`PaginationMode::Page`] - page-index requests, each page replaces the items
//!
//! # Concurrency
//!
//! At most one fetch is in flight per loader. Every entry point checks the
//! loading flag first; a call made while a fetch is running returns
//! [`LoadOutcome::Skipped`] without touching state or issuing a fetch.

mod builder;
mod cursor;
mod mode;
mod offset;
mod paged;
mod state;

pub use builder::PagedDataLoaderBuilder;
pub use mode::PaginationMode;

use std::hash::Hash;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::watch;

use crate::error::Error;
use crate::error::FetchError;
use crate::request::PageParams;
use crate::request::RequestBuilder;
use crate::source::DataSource;
use crate::status::LoaderStatus;

use state::FetchPlan;
use state::LoaderState;
use state::ReloadFlags;

/// Projection from an item to the cursor that continues after it.
pub type CursorFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Result of a loader operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fetch was performed and its results applied.
    Loaded,
    /// The call was ignored: a fetch was already in flight, or the call does
    /// not apply in the current mode or position.
    Skipped,
}

impl LoadOutcome {
    /// Returns `true` if a fetch was performed.
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Returns `true` if the call was ignored.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Generic, mode-switchable data loader behind a paginated table.
///
/// `T` is the item type; items are de-duplicated by their `Eq`/`Hash`
/// implementation. `R` is the caller's request type, built from
/// [`PageParams`] by the configured [`RequestBuilder`].
///
/// The loader is cheap to clone (uses `Arc` internally); clones share state.
///
/// # Example
///
/// ```
/// use flowtable_lib::loader::{PagedDataLoader, PaginationMode};
/// use flowtable_lib::request::IdentityRequest;
/// use flowtable_lib::source::StaticSource;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let rows: Vec<u32> = (1..=25).collect();
/// let loader = PagedDataLoader::builder()
///     .mode(PaginationMode::Offset)
///     .page_size(10)
///     .data_source(StaticSource::new(rows, PaginationMode::Offset))
///     .request_builder(IdentityRequest)
///     .build()?;
///
/// loader.load_initial().await?;
/// assert_eq!(loader.len(), 10);
/// assert!(loader.has_more_data());
///
/// loader.show_more().await?;
/// loader.show_more().await?;
/// assert_eq!(loader.len(), 25);
/// assert!(!loader.has_more_data());
/// # Ok::<(), flowtable_lib::error::Error>(())
/// # }).unwrap();
/// ```
pub struct PagedDataLoader<T, R = PageParams> {
    inner: Arc<LoaderInner<T, R>>,
}

struct LoaderInner<T, R> {
    mode: PaginationMode,
    source: Arc<dyn DataSource<R, T>>,
    request_builder: Arc<dyn RequestBuilder<R>>,
    cursor_fn: Option<CursorFn<T>>,
    loading: AtomicBool,
    state: Mutex<LoaderState<T>>,
    status: watch::Sender<LoaderStatus>,
}

impl<T, R> Clone for PagedDataLoader<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, R> std::fmt::Debug for PagedDataLoader<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedDataLoader")
            .field("mode", &self.inner.mode)
            .field("loading", &self.inner.loading.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T, R> PagedDataLoader<T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    /// Creates a new builder for constructing a loader.
    pub fn builder() -> PagedDataLoaderBuilder<T, R> {
        PagedDataLoaderBuilder::new()
    }

    pub(crate) fn from_parts(
        mode: PaginationMode,
        source: Arc<dyn DataSource<R, T>>,
        request_builder: Arc<dyn RequestBuilder<R>>,
        cursor_fn: Option<CursorFn<T>>,
        page_size: usize,
        search: Option<String>,
    ) -> Self {
        let state = LoaderState::new(page_size, search);
        let (status, _) = watch::channel(LoaderStatus::initial(mode, state.page_size));
        Self {
            inner: Arc::new(LoaderInner {
                mode,
                source,
                request_builder,
                cursor_fn,
                loading: AtomicBool::new(false),
                state: Mutex::new(state),
                status,
            }),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Loads the first page, discarding anything loaded before.
    ///
    /// Offset and cursor loaders request one page of `page_size` items (cursor
    /// requests ask for one extra to detect more data); page loaders request
    /// page 1. Ignored while a fetch is in flight.
    pub async fn load_initial(&self) -> Result<LoadOutcome, Error> {
        let Some(guard) = self.try_begin() else {
            log::trace!("load_initial ignored: fetch in flight");
            return Ok(LoadOutcome::Skipped);
        };

        let plan = {
            let state = self.lock();
            self.initial_plan(&state)
        };
        log::debug!("Loading initial {} page: {:?}", self.inner.mode, plan.params);
        self.execute(guard, plan).await
    }

    /// Fetches the next batch and merges it into the loaded items.
    ///
    /// Only applies to offset and cursor loaders. Ignored while a fetch is in
    /// flight or when no more data is expected.
    pub async fn show_more(&self) -> Result<LoadOutcome, Error> {
        let Some(guard) = self.try_begin() else {
            log::trace!("show_more ignored: fetch in flight");
            return Ok(LoadOutcome::Skipped);
        };

        if !self.inner.mode.accumulates() {
            log::trace!("show_more ignored: {} mode", self.inner.mode);
            return Ok(LoadOutcome::Skipped);
        }

        let plan = {
            let state = self.lock();
            if !state.has_more_data {
                log::trace!("show_more ignored: no more data");
                return Ok(LoadOutcome::Skipped);
            }
            if self.inner.mode == PaginationMode::Cursor {
                cursor::plan(&state, false)
            } else {
                offset::plan(&state, false)
            }
        };
        log::debug!("Loading more ({}): {:?}", self.inner.mode, plan.params);
        self.execute(guard, plan).await
    }

    /// Replaces the loaded items with page `page` (1-based).
    ///
    /// Only applies to page loaders. Ignored while a fetch is in flight, for
    /// `page < 1`, and for pages beyond the known total.
    pub async fn go_to_page(&self, page: usize) -> Result<LoadOutcome, Error> {
        let Some(guard) = self.try_begin() else {
            log::trace!("go_to_page({}) ignored: fetch in flight", page);
            return Ok(LoadOutcome::Skipped);
        };

        let plan = {
            let state = self.lock();
            match self.inner.mode {
                PaginationMode::Page => {}
                PaginationMode::Offset | PaginationMode::Cursor => {
                    log::trace!("go_to_page({}) ignored: {} mode", page, self.inner.mode);
                    return Ok(LoadOutcome::Skipped);
                }
            }
            if page < 1 || (state.total_pages != 0 && page > state.total_pages) {
                log::trace!(
                    "go_to_page({}) ignored: outside 1..={}",
                    page,
                    state.total_pages
                );
                return Ok(LoadOutcome::Skipped);
            }
            paged::plan(&state, page, false)
        };
        log::debug!("Loading page {}: {:?}", page, plan.params);
        self.execute(guard, plan).await
    }

    /// Moves to the page after the current one.
    pub async fn next_page(&self) -> Result<LoadOutcome, Error> {
        let page = self.current_page() + 1;
        self.go_to_page(page).await
    }

    /// Moves to the page before the current one.
    pub async fn previous_page(&self) -> Result<LoadOutcome, Error> {
        let page = self.current_page().saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Reloads from a pristine state.
    ///
    /// Resets the first-load and more-data flags, so observers see a first
    /// load in progress, then behaves like [`load_initial`](Self::load_initial).
    /// If the reload fails or is dropped, the flags are restored and the
    /// previously loaded items stay in place.
    pub async fn reload(&self) -> Result<LoadOutcome, Error> {
        let Some(mut guard) = self.try_begin() else {
            log::trace!("reload ignored: fetch in flight");
            return Ok(LoadOutcome::Skipped);
        };

        let plan = {
            let mut state = self.lock();
            guard.rollback = Some(state.begin_reload());
            self.initial_plan(&state)
        };
        log::debug!("Reloading {} loader: {:?}", self.inner.mode, plan.params);
        self.execute(guard, plan).await
    }

    /// Sets the page size used by subsequent fetches, clamped to at least 1.
    ///
    /// Typically called once with the row count measured by the render
    /// surface before the first load. Returns `false` if ignored because a
    /// fetch is in flight.
    pub fn set_page_size(&self, page_size: usize) -> bool {
        let Some(guard) = self.try_begin() else {
            return false;
        };
        self.lock().page_size = page_size.max(1);
        drop(guard);
        self.publish();
        true
    }

    /// Sets the search term forwarded with every request.
    ///
    /// Does not fetch; call [`reload`](Self::reload) afterwards. An empty term
    /// clears the search. Returns `false` if ignored because a fetch is in
    /// flight.
    pub fn set_search(&self, search: Option<String>) -> bool {
        let Some(_guard) = self.try_begin() else {
            return false;
        };
        self.lock().search = search.filter(|s| !s.is_empty());
        true
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Returns a copy of the loaded items, in display order.
    pub fn items(&self) -> Vec<T> {
        self.lock().items.to_vec()
    }

    /// Returns the number of loaded items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns `true` if no items are loaded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Returns `true` until the first load completes.
    pub fn is_first_load(&self) -> bool {
        self.lock().is_first_load
    }

    /// Returns `true` if `show_more` is expected to yield more items.
    pub fn has_more_data(&self) -> bool {
        self.lock().has_more_data
    }

    /// Returns `true` if page mode knows of a page after the current one.
    pub fn has_next_page(&self) -> bool {
        let state = self.lock();
        state.current_page < state.total_pages
    }

    /// Returns the current 1-based page.
    pub fn current_page(&self) -> usize {
        self.lock().current_page
    }

    /// Returns the total page count reported by the source, `0` if unknown.
    pub fn total_pages(&self) -> usize {
        self.lock().total_pages
    }

    /// Returns the visible page size.
    pub fn page_size(&self) -> usize {
        self.lock().page_size
    }

    /// Returns the last-seen cursor.
    pub fn cursor(&self) -> Option<String> {
        self.lock().cursor.clone()
    }

    /// Returns the current search term.
    pub fn search(&self) -> Option<String> {
        self.lock().search.clone()
    }

    /// Returns the pagination mode.
    pub fn mode(&self) -> PaginationMode {
        self.inner.mode
    }

    /// Returns a snapshot of the loader's flags and counters.
    pub fn status(&self) -> LoaderStatus {
        self.lock().status(self.inner.mode, self.is_loading())
    }

    /// Subscribes to status changes.
    ///
    /// The receiver is updated whenever a fetch starts, whenever results are
    /// applied, and whenever the loading flag is released.
    pub fn subscribe(&self) -> watch::Receiver<LoaderStatus> {
        self.inner.status.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, LoaderState<T>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let status = self.status();
        self.inner.status.send_replace(status);
    }

    /// Claims the loading flag, or returns `None` if it is already held.
    fn try_begin(&self) -> Option<LoadingGuard<'_, T, R>> {
        self.inner
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        Some(LoadingGuard {
            loader: self,
            announced: false,
            rollback: None,
        })
    }

    fn initial_plan(&self, state: &LoaderState<T>) -> FetchPlan {
        match self.inner.mode {
            PaginationMode::Cursor => cursor::plan(state, true),
            PaginationMode::Offset => offset::plan(state, true),
            PaginationMode::Page => paged::plan(state, 1, true),
        }
    }

    /// Builds the request, fetches, and applies the response.
    ///
    /// Nothing is written to the state until the fetch has succeeded, so an
    /// error leaves the loader exactly as it was.
    async fn execute(
        &self,
        mut guard: LoadingGuard<'_, T, R>,
        plan: FetchPlan,
    ) -> Result<LoadOutcome, Error> {
        guard.announce();

        let request = self
            .inner
            .request_builder
            .build(plan.params.clone())
            .map_err(FetchError::Request)?;

        let response = self.inner.source.fetch(request).await.map_err(|e| {
            log::debug!("Fetch failed for {:?}: {}", plan.params, e);
            FetchError::Source(e)
        })?;

        {
            let mut state = self.lock();
            let received = match self.inner.mode {
                PaginationMode::Cursor => {
                    cursor::apply(&mut state, &plan, response, self.inner.cursor_fn.as_ref())
                }
                PaginationMode::Offset => offset::apply(&mut state, &plan, response),
                PaginationMode::Page => paged::apply(&mut state, &plan, response)?,
            };
            if plan.reset {
                state.is_first_load = false;
            }
            guard.rollback = None;
            log::debug!(
                "Applied {} items ({} loaded, more: {}, page {}/{})",
                received,
                state.items.len(),
                state.has_more_data,
                state.current_page,
                state.total_pages
            );
        }

        drop(guard);
        Ok(LoadOutcome::Loaded)
    }
}

/// Holds a loader's loading flag; releases it on drop.
///
/// Dropping covers every exit path: success, early return, error, and the
/// operation's future being dropped mid-fetch. Flags still pending in
/// `rollback` were never committed and are restored first.
struct LoadingGuard<'a, T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    loader: &'a PagedDataLoader<T, R>,
    announced: bool,
    rollback: Option<ReloadFlags>,
}

impl<T, R> LoadingGuard<'_, T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    /// Publishes the loading status once a fetch is definitely going ahead.
    fn announce(&mut self) {
        self.announced = true;
        self.loader.publish();
    }
}

impl<T, R> Drop for LoadingGuard<'_, T, R>
where
    T: Clone + Eq + Hash + Send + 'static,
    R: Send + 'static,
{
    fn drop(&mut self) {
        if let Some(flags) = self.rollback.take() {
            self.loader.lock().restore(flags);
        }
        self.loader.inner.loading.store(false, Ordering::SeqCst);
        if self.announced {
            self.loader.publish();
        }
    }
}
