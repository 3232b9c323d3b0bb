//! SoQL query building
//!
//! Translates per-command filter options into the `$where`, `$order`, `$limit`,
//! `$offset` and `$q` parameters understood by the Socrata API.

pub mod builder;
pub mod filter_spec;
pub mod filters;
pub mod params;
pub mod result;

pub use builder::{Query, QueryBuilder, build_params};
pub use filter_spec::{DatasetFilters, FilterSpec, PayrollFilters, SpendingFilters};
pub use filters::{Filter, FilterValue};
pub use params::RemoteParams;
pub use result::{Record, ResultSet};
