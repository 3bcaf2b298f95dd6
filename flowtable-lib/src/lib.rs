//! Paged data loading for tables
//!
//! A Rust async library driving the loading and pagination state of a data
//! table: offset ("show more"), cursor, and page-by-page strategies over a
//! caller-supplied data source.

pub mod config;
pub mod error;
pub mod items;
pub mod loader;
pub mod request;
pub mod response;
pub mod source;
pub mod status;
pub mod viewport;

pub use config::LoaderConfig;
pub use error::Error;
pub use loader::LoadOutcome;
pub use loader::PagedDataLoader;
pub use loader::PaginationMode;
pub use response::LoadResponse;
pub use status::LoaderStatus;
