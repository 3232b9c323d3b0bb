//! CTHRU Socrata API module
//!
//! SoQL query building, the HTTP client for row and metadata requests, and the
//! credential handling that goes with it.

pub mod auth;
pub mod client;
pub mod constants;
pub mod metadata;
pub mod query;

pub use auth::AuthMode;
pub use client::{ClientConfig, CthruClient};
pub use metadata::{ColumnMetadata, DatasetMetadata};
pub use query::{
    DatasetFilters, Filter, FilterSpec, FilterValue, PayrollFilters, Query, QueryBuilder,
    Record, RemoteParams, ResultSet, SpendingFilters, build_params,
};
