//! Command implementations shared by the binary and the integration tests

pub mod datasets;
pub mod query;
