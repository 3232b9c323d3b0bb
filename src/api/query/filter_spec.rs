//! Per-command filter options
//!
//! Each query command gets its own variant carrying only the filters its
//! dataset understands.

use std::num::NonZeroU32;

use crate::datasets::{self, Dataset};

pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(100) {
    Some(limit) => limit,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub limit: NonZeroU32,
    pub offset: Option<u32>,
    pub search: Option<String>,
    /// `field:direction`, forwarded verbatim as `$order`
    pub sort: Option<String>,
    pub filters: DatasetFilters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetFilters {
    Spending(SpendingFilters),
    Payroll(PayrollFilters),
    Settlements,
    Revenue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingFilters {
    /// Budget fiscal year; stored as text by the portal
    pub year: Option<String>,
    pub department: Option<String>,
    pub vendor: Option<String>,
    pub fund: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollFilters {
    pub year: Option<i32>,
    pub department: Option<String>,
    /// Matched against first and last name
    pub name: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterSpec {
    pub fn new(filters: DatasetFilters) -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: None,
            search: None,
            sort: None,
            filters,
        }
    }

    pub fn spending(filters: SpendingFilters) -> Self {
        Self::new(DatasetFilters::Spending(filters))
    }

    pub fn payroll(filters: PayrollFilters) -> Self {
        Self::new(DatasetFilters::Payroll(filters))
    }

    pub fn with_limit(mut self, limit: NonZeroU32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Command name, also the dataset key
    pub fn command(&self) -> &'static str {
        self.filters.command()
    }

    pub fn dataset(&self) -> &'static Dataset {
        datasets::builtin(self.command())
    }
}

impl DatasetFilters {
    pub fn command(&self) -> &'static str {
        match self {
            DatasetFilters::Spending(_) => "spending",
            DatasetFilters::Payroll(_) => "payroll",
            DatasetFilters::Settlements => "settlements",
            DatasetFilters::Revenue => "revenue",
        }
    }
}
