//! Delivery of rendered results to stdout, an output file, and snapshots

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use log::{debug, info};

use super::format::{NO_RESULTS, OutputFormat};
use super::snapshot::Snapshot;
use crate::api::constants;
use crate::api::query::{FilterSpec, RemoteParams, ResultSet};
use crate::datasets::Dataset;

/// Where and how results are delivered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Write the rendering here instead of stdout
    pub output_path: Option<PathBuf>,
    pub show_url: bool,
    pub save_snapshot: bool,
}

/// Links that reproduce the query outside this tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLinks {
    /// Resource URL with every parameter except `$limit`
    pub api_url: String,
    pub portal_url: String,
}

impl QueryLinks {
    pub fn new(base_url: &str, dataset: &Dataset, params: &RemoteParams) -> Self {
        Self {
            api_url: params.browser_url(base_url, dataset.id),
            portal_url: constants::portal_url(base_url, dataset.id),
        }
    }
}

/// One query's results, ready for delivery
pub struct Delivery<'a> {
    pub result: &'a ResultSet,
    pub rendered: &'a str,
    pub spec: &'a FilterSpec,
    pub options: &'a OutputOptions,
    pub links: &'a QueryLinks,
    /// Directory for snapshot files
    pub snapshot_dir: &'a Path,
    pub fetched_at: DateTime<Local>,
}

/// What [`deliver`] wrote to disk
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub snapshot_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// Save the snapshot if requested, then print the rendering to `out` or write it
/// to the requested file.
///
/// With no rows only `No results found.` is printed: no output file and no
/// record count. A requested snapshot is still written with an empty `data`.
pub fn deliver(out: &mut impl Write, delivery: &Delivery<'_>) -> Result<DeliveryReport> {
    let mut report = DeliveryReport::default();
    let count = delivery.result.len();

    if delivery.options.save_snapshot {
        let snapshot = Snapshot::new(
            &delivery.links.api_url,
            &delivery.links.portal_url,
            &delivery.fetched_at,
            delivery.result,
        );
        let path = snapshot
            .write(delivery.snapshot_dir, delivery.spec, &delivery.fetched_at)
            .with_context(|| {
                format!("Failed to write snapshot to {}", delivery.snapshot_dir.display())
            })?;
        writeln!(out, "JSON saved to {}", path.display().to_string().green())?;
        report.snapshot_path = Some(path);
    }

    if delivery.result.is_empty() {
        debug!("No records returned for {}", delivery.spec.command());
        writeln!(out, "{}", NO_RESULTS)?;
    } else if let Some(path) = &delivery.options.output_path {
        fs::write(path, delivery.rendered)
            .with_context(|| format!("Failed to write output to: {}", path.display()))?;
        info!(
            "Wrote {} records as {} to {}",
            count,
            delivery.options.format.as_str(),
            path.display()
        );
        writeln!(
            out,
            "Results saved to {} ({} records)",
            path.display().to_string().green(),
            count
        )?;
        report.output_path = Some(path.clone());
    } else {
        writeln!(out, "{}", delivery.rendered)?;
        writeln!(out)?;
        writeln!(out, "--- {} records ---", count)?;
    }

    if delivery.options.show_url {
        writeln!(out)?;
        writeln!(out, "View in browser: {}", delivery.links.api_url)?;
        writeln!(out, "               Portal: {}", delivery.links.portal_url)?;
    }

    Ok(report)
}
