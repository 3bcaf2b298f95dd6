//! Cursor pagination.
//!
//! Requests one item beyond the visible page size; receiving it means more
//! data exists, without a separate count query.

use std::hash::Hash;

use super::CursorFn;
use super::state::FetchPlan;
use super::state::LoaderState;
use crate::request::PageParams;
use crate::response::LoadResponse;

pub(super) fn plan<T: Eq + Hash>(state: &LoaderState<T>, reset: bool) -> FetchPlan {
    let cursor = if reset {
        String::new()
    } else {
        state.cursor.clone().unwrap_or_default()
    };
    FetchPlan {
        params: state.params(PageParams::cursor(cursor, state.page_size.saturating_add(1))),
        page: if reset { 1 } else { state.current_page },
        page_size: state.page_size,
        reset,
    }
}

/// Applies a cursor response, returning how many new items were added.
pub(super) fn apply<T: Eq + Hash>(
    state: &mut LoaderState<T>,
    plan: &FetchPlan,
    response: LoadResponse<T>,
    cursor_fn: Option<&CursorFn<T>>,
) -> usize {
    if plan.reset {
        state.reset_paging();
    }

    let Some(mut items) = response.into_items() else {
        log::warn!("Cursor response carried no items, treating as empty");
        state.has_more_data = false;
        state.refresh_empty();
        return 0;
    };

    let has_more = items.len() > plan.page_size;
    items.truncate(plan.page_size);

    if let Some(last) = items.last() {
        state.cursor = cursor_fn.and_then(|f| f(last));
    }

    let added = state.items.union(items);
    state.has_more_data = has_more;
    state.refresh_empty();
    added
}
