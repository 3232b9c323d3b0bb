use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct DatasetsArgs {
    /// Show detailed info for a dataset
    #[arg(long, value_name = "NAME")]
    pub info: Option<String>,
}
