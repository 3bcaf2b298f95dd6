//! Shared fixtures for loader integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use flowtable_lib::error::BoxError;
use flowtable_lib::request::IdentityRequest;
use flowtable_lib::request::PageParams;
use flowtable_lib::source::DataSource;
use flowtable_lib::LoadResponse;
use flowtable_lib::PagedDataLoader;
use flowtable_lib::PaginationMode;
use tokio::sync::Semaphore;

/// A table row; rows are equal when their ids are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row(pub u32);

pub fn rows(ids: impl IntoIterator<Item = u32>) -> Vec<Row> {
    ids.into_iter().map(Row).collect()
}

pub fn row_cursor(row: &Row) -> Option<String> {
    Some(format!("r{}", row.0))
}

/// A data source replaying queued responses and recording every request.
///
/// When gated, each fetch waits for a permit from [`Scripted::release`].
pub struct Scripted {
    responses: Mutex<VecDeque<Result<LoadResponse<Row>, String>>>,
    requests: Mutex<Vec<PageParams>>,
    gate: Option<Semaphore>,
}

impl Scripted {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn respond(self, response: LoadResponse<Row>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn push(&self, response: LoadResponse<Row>) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn requests(&self) -> Vec<PageParams> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DataSource<PageParams, Row> for Scripted {
    async fn fetch(&self, request: PageParams) -> Result<LoadResponse<Row>, BoxError> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Ok(LoadResponse::none()),
        }
    }
}

pub fn loader(
    mode: PaginationMode,
    page_size: usize,
    source: &Arc<Scripted>,
) -> PagedDataLoader<Row> {
    let mut builder = PagedDataLoader::<Row, PageParams>::builder()
        .mode(mode)
        .page_size(page_size)
        .shared_data_source(source.clone())
        .request_builder(IdentityRequest);
    if mode == PaginationMode::Cursor {
        builder = builder.item_to_cursor(row_cursor);
    }
    builder.build().unwrap()
}

/// Waits until `loader` has a fetch in flight.
pub async fn until_loading(loader: &PagedDataLoader<Row>) {
    while !loader.is_loading() {
        tokio::task::yield_now().await;
    }
}
