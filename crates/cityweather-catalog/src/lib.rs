//! City catalog for CityWeather
//!
//! Fetches pages of cities from the open-data catalog and keeps the
//! client-side list state: pagination, prefix suggestions and the
//! sort/filter pipeline that produces the displayed ordering.

pub mod browser;
pub mod client;
pub mod error;
pub mod pagination;
pub mod query;
pub mod types;

pub use browser::{CityBrowserState, PageOutcome, SearchState};
pub use client::CatalogClient;
pub use error::CatalogError;
pub use pagination::{PageRequest, PaginationState, PAGE_SIZE};
pub use query::{derive_view, suggest, ColumnSort};
pub use types::{CityRecord, FilterOption, SortDirection, SortField};
