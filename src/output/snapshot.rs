//! Timestamped JSON snapshots of a query's raw results
//!
//! A snapshot wraps the rows with where they came from (API and portal URLs),
//! when they were fetched, and how many there were.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::api::query::{DatasetFilters, FilterSpec, ResultSet};
use crate::error::Result;

/// Longest filter fragment kept in a snapshot filename
pub const MAX_COMPONENT_CHARS: usize = 20;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub api_url: &'a str,
    pub portal_url: &'a str,
    pub query_timestamp: String,
    pub record_count: usize,
    pub data: &'a ResultSet,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        api_url: &'a str,
        portal_url: &'a str,
        fetched_at: &DateTime<Local>,
        data: &'a ResultSet,
    ) -> Self {
        Self {
            api_url,
            portal_url,
            query_timestamp: fetched_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            record_count: data.len(),
            data,
        }
    }

    /// Write to `dir` under the filename derived from `spec`
    pub fn write(&self, dir: &Path, spec: &FilterSpec, fetched_at: &DateTime<Local>) -> Result<PathBuf> {
        let path = dir.join(snapshot_filename(spec, fetched_at));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!("Wrote snapshot with {} records to {}", self.record_count, path.display());
        Ok(path)
    }
}

/// Make a filter value safe for a filename: non-word characters become `_`,
/// the result is cut to [`MAX_COMPONENT_CHARS`], then edge underscores go.
pub fn sanitize_component(value: &str) -> String {
    let replaced = NON_WORD.replace_all(value, "_");
    let truncated: String = replaced.chars().take(MAX_COMPONENT_CHARS).collect();
    truncated.trim_matches('_').to_string()
}

/// `{command}_fy{year}_{filters..}_{YYYYMMDD_HHMMSS}.json`; absent filters are skipped
pub fn snapshot_filename(spec: &FilterSpec, fetched_at: &DateTime<Local>) -> String {
    let mut parts = vec![spec.command().to_string()];

    let mut text_filters: Vec<Option<&str>> = Vec::new();
    match &spec.filters {
        DatasetFilters::Spending(filters) => {
            if let Some(year) = &filters.year {
                parts.push(format!("fy{}", year));
            }
            text_filters.push(filters.vendor.as_deref());
            text_filters.push(filters.fund.as_deref());
            text_filters.push(filters.department.as_deref());
        }
        DatasetFilters::Payroll(filters) => {
            if let Some(year) = filters.year {
                parts.push(format!("fy{}", year));
            }
            text_filters.push(filters.department.as_deref());
            text_filters.push(filters.name.as_deref());
        }
        DatasetFilters::Settlements | DatasetFilters::Revenue => {}
    }
    text_filters.push(spec.search.as_deref());

    parts.extend(
        text_filters
            .into_iter()
            .flatten()
            .map(sanitize_component)
            .filter(|part| !part.is_empty()),
    );

    parts.push(fetched_at.format("%Y%m%d_%H%M%S").to_string());
    format!("{}.json", parts.join("_"))
}
