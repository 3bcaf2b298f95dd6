//! Page pagination.
//!
//! Each fetch replaces the visible items with exactly one page.

use std::hash::Hash;

use super::state::FetchPlan;
use super::state::LoaderState;
use crate::error::FetchError;
use crate::request::PageParams;
use crate::response::LoadResponse;

pub(super) fn plan<T: Eq + Hash>(state: &LoaderState<T>, page: usize, reset: bool) -> FetchPlan {
    FetchPlan {
        params: state.params(PageParams::page(page, state.page_size)),
        page,
        page_size: state.page_size,
        reset,
    }
}

/// Applies a page response, returning the number of items on the page.
///
/// A response without an item collection is rejected before anything is
/// changed.
pub(super) fn apply<T: Eq + Hash>(
    state: &mut LoaderState<T>,
    plan: &FetchPlan,
    response: LoadResponse<T>,
) -> Result<usize, FetchError> {
    let (items, total) = response.into_parts();
    let items = items.ok_or(FetchError::MissingItems { page: plan.page })?;

    if plan.reset {
        state.reset_paging();
    }
    state.current_page = plan.page;
    state.items.replace(items);
    state.total_pages = total;
    state.refresh_empty();
    Ok(state.items.len())
}
