use super::commands::{DatasetsArgs, PayrollArgs, SearchArgs, SpendingArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cthru", version)]
#[command(about = "Query Massachusetts state financial data from CTHRU")]
#[command(after_help = "Examples:
  cthru spending --vendor \"W. B MASON\" --year 2024
  cthru payroll --dept \"Police\" --year 2025 --sort \"pay_total_actual:desc\"
  cthru spending --search \"construction\" --min-amount 100000 --format csv
  cthru datasets --info spending")]
pub struct Cli {
    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query vendor/department spending
    Spending(SpendingArgs),
    /// Query state employee compensation
    Payroll(PayrollArgs),
    /// Query legal settlements
    Settlements(SearchArgs),
    /// Query revenue collections
    Revenue(SearchArgs),
    /// List available datasets
    Datasets(DatasetsArgs),
}
