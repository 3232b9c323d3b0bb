pub mod datasets;
pub mod query;

pub use datasets::DatasetsArgs;
pub use query::{PayrollArgs, SearchArgs, SpendingArgs};
