//! Result rendering and delivery

pub mod format;
pub mod snapshot;
pub mod writer;

pub use format::{NO_RESULTS, OutputFormat, render};
pub use snapshot::{Snapshot, sanitize_component, snapshot_filename};
pub use writer::{Delivery, DeliveryReport, OutputOptions, QueryLinks, deliver};
