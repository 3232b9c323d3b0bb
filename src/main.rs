use anyhow::Result;
use clap::Parser;
use colored::*;
use log::{debug, info};
use std::io;
use std::process::ExitCode;

mod cli;

use cli::{Cli, Commands};
use cthru_cli::api::CthruClient;
use cthru_cli::api::query::DatasetFilters;
use cthru_cli::commands::{datasets, query};
use cthru_cli::config::{self, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    info!("Starting cthru");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to a file in the config directory (truncated on each run) so stdout
/// stays clean for table, CSV and JSON output
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();

    let log_file = Config::ensure_config_dir().ok().and_then(|dir| {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(dir.join(config::LOG_FILE))
            .ok()
    });
    if let Some(file) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let default_limit = config.default_limit();
    let mut stdout = io::stdout().lock();

    let (spec, options) = match cli.command {
        Commands::Datasets(args) => {
            return match args.info {
                Some(key) => {
                    let client = build_client(&config)?;
                    datasets::info_command(&mut stdout, &client, &key).await
                }
                None => datasets::list_command(&mut stdout),
            };
        }
        Commands::Spending(args) => args.into_query(default_limit)?,
        Commands::Payroll(args) => args.into_query(default_limit)?,
        Commands::Settlements(args) => args.into_query(DatasetFilters::Settlements, default_limit),
        Commands::Revenue(args) => args.into_query(DatasetFilters::Revenue, default_limit),
    };

    let client = build_client(&config)?;
    let report = query::run_command(&mut stdout, &client, &spec, &options, &config.snapshot_dir()).await?;
    debug!("Delivery report: {:?}", report);

    Ok(())
}

fn build_client(config: &Config) -> Result<CthruClient> {
    Ok(CthruClient::new(config.client_config(), &config.credentials())?)
}
