use anyhow::Result;
use clap::Args;
use std::num::NonZeroU32;
use std::path::PathBuf;

use cthru_cli::api::query::{DatasetFilters, FilterSpec, PayrollFilters, SpendingFilters};
use cthru_cli::output::{OutputFormat, OutputOptions};

/// Options shared by every dataset query
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Number of records (default: 100, or `default_limit` from config)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Starting record offset for pagination
    #[arg(long)]
    pub offset: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Save output to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// General text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort by field (e.g., 'amount:desc')
    #[arg(long)]
    pub sort: Option<String>,

    /// Show link to view data in web browser
    #[arg(long)]
    pub url: bool,

    /// Save raw JSON response to timestamped file
    #[arg(long)]
    pub save_json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SpendingArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Filter by fiscal year (e.g., 2024)
    #[arg(short, long)]
    pub year: Option<String>,

    /// Filter by department name
    #[arg(short, long)]
    pub dept: Option<String>,

    /// Filter by vendor name
    #[arg(short, long)]
    pub vendor: Option<String>,

    /// Filter by fund name (e.g., 'opioid')
    #[arg(long)]
    pub fund: Option<String>,

    /// Minimum dollar amount
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Maximum dollar amount
    #[arg(long)]
    pub max_amount: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct PayrollArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Filter by year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Filter by department/division
    #[arg(short, long)]
    pub dept: Option<String>,

    /// Filter by employee name
    #[arg(long)]
    pub name: Option<String>,

    /// Minimum total pay
    #[arg(long)]
    pub min_amount: Option<f64>,

    /// Maximum total pay
    #[arg(long)]
    pub max_amount: Option<f64>,
}

/// Settlements and revenue take only the shared options
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl CommonArgs {
    fn filter_spec(&self, filters: DatasetFilters, default_limit: NonZeroU32) -> FilterSpec {
        FilterSpec {
            limit: self.limit.and_then(NonZeroU32::new).unwrap_or(default_limit),
            offset: self.offset,
            search: present(&self.search),
            sort: present(&self.sort),
            filters,
        }
    }

    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            format: self.format,
            output_path: self.output.clone(),
            show_url: self.url,
            save_snapshot: self.save_json,
        }
    }
}

impl SpendingArgs {
    pub fn into_query(self, default_limit: NonZeroU32) -> Result<(FilterSpec, OutputOptions)> {
        check_amount_range(self.min_amount, self.max_amount)?;
        let filters = DatasetFilters::Spending(SpendingFilters {
            year: present(&self.year),
            department: present(&self.dept),
            vendor: present(&self.vendor),
            fund: present(&self.fund),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        });
        Ok((
            self.common.filter_spec(filters, default_limit),
            self.common.output_options(),
        ))
    }
}

impl PayrollArgs {
    pub fn into_query(self, default_limit: NonZeroU32) -> Result<(FilterSpec, OutputOptions)> {
        check_amount_range(self.min_amount, self.max_amount)?;
        let filters = DatasetFilters::Payroll(PayrollFilters {
            year: self.year,
            department: present(&self.dept),
            name: present(&self.name),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        });
        Ok((
            self.common.filter_spec(filters, default_limit),
            self.common.output_options(),
        ))
    }
}

impl SearchArgs {
    pub fn into_query(
        self,
        filters: DatasetFilters,
        default_limit: NonZeroU32,
    ) -> (FilterSpec, OutputOptions) {
        (
            self.common.filter_spec(filters, default_limit),
            self.common.output_options(),
        )
    }
}

/// Blank strings count as not given
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn check_amount_range(min: Option<f64>, max: Option<f64>) -> Result<()> {
    for amount in [min, max].into_iter().flatten() {
        if !amount.is_finite() {
            anyhow::bail!("Amount filters must be finite numbers, got {}", amount);
        }
    }
    Ok(())
}
