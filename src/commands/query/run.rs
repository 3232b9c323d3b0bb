use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use log::{debug, info};

use crate::api::CthruClient;
use crate::api::query::{FilterSpec, build_params};
use crate::output::{Delivery, DeliveryReport, OutputOptions, QueryLinks, deliver, render};

/// Run one dataset query end to end
///
/// # Arguments
/// * `out` - Destination for rendered results and status lines
/// * `client` - Portal client
/// * `spec` - Filters for the chosen command
/// * `options` - Output format and destinations
/// * `snapshot_dir` - Directory for `--save-json` files
///
/// # Returns
/// * `Ok(DeliveryReport)` - Files written, if any
/// * `Err(anyhow::Error)` - Fetch or write failure; fetch failures wrap [`crate::Error`]
pub async fn run_command(
    out: &mut impl Write,
    client: &CthruClient,
    spec: &FilterSpec,
    options: &OutputOptions,
    snapshot_dir: &Path,
) -> Result<DeliveryReport> {
    let dataset = spec.dataset();
    info!("Querying {} ({})", dataset.name, dataset.id);
    debug!("Filters: {:?}", spec);

    let params = build_params(spec);
    let result = client.fetch(dataset.id, &params).await?;
    let fetched_at = Local::now();

    let rendered = render(&result, options.format, dataset.default_columns);
    let links = QueryLinks::new(client.base_url(), dataset, &params);

    let report = deliver(
        out,
        &Delivery {
            result: &result,
            rendered: &rendered,
            spec,
            options,
            links: &links,
            snapshot_dir,
            fetched_at,
        },
    )?;

    info!("Query for {} delivered {} records", spec.command(), result.len());
    Ok(report)
}
