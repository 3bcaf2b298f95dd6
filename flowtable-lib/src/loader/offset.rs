//! Offset pagination.
//!
//! Requests pages by index and accumulates them; availability of more data
//! is judged against the total reported by the source.

use std::hash::Hash;

use super::state::FetchPlan;
use super::state::LoaderState;
use crate::request::PageParams;
use crate::response::LoadResponse;

pub(super) fn plan<T: Eq + Hash>(state: &LoaderState<T>, reset: bool) -> FetchPlan {
    let page = if reset { 1 } else { state.current_page + 1 };
    FetchPlan {
        params: state.params(PageParams::page(page, state.page_size)),
        page,
        page_size: state.page_size,
        reset,
    }
}

/// Applies an offset response, returning how many new items were added.
pub(super) fn apply<T: Eq + Hash>(
    state: &mut LoaderState<T>,
    plan: &FetchPlan,
    response: LoadResponse<T>,
) -> usize {
    if plan.reset {
        state.reset_paging();
    }
    state.current_page = plan.page;

    let (items, total) = response.into_parts();
    let Some(items) = items else {
        log::warn!("Offset response for page {} carried no items, treating as empty", plan.page);
        state.has_more_data = false;
        state.refresh_empty();
        return 0;
    };

    let added = state.items.union(items);
    // Compared against everything accumulated, not just this page.
    state.has_more_data = total > state.items.len();
    state.refresh_empty();
    added
}
