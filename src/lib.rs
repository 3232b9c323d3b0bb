//! Query Massachusetts CTHRU financial datasets through the Socrata API.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod datasets;
pub mod error;
pub mod output;

pub use error::{Error, Result};
