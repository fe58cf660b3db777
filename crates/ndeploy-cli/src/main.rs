//! ndeploy - copy built n8n nodes into the local dev instance
//!
//! Usage:
//!   ndeploy                 # Deploy dist/src into ~/.n8n-dev/.n8n/custom
//!   ndeploy --dry-run       # Show what would be copied
//!   ndeploy --verify        # Deploy, then compare destination with source

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ndeploy_core::config::{ConfigStore, DeployConfig, home_dir};
use ndeploy_core::context::DeployContext;
use ndeploy_core::deploy::{execute, plan};

use crate::output::ConsoleObserver;

#[derive(Parser)]
#[command(name = "ndeploy")]
#[command(about = "Deploy built n8n credentials and nodes to the local dev instance", long_about = None)]
struct Cli {
    /// Build output directory containing credentials/ and nodes/ [default: dist/src]
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Custom extension directory of the dev instance [default: ~/.n8n-dev/.n8n/custom]
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Config file (defaults to ./ndeploy.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the planned copies without touching the destination
    #[arg(long)]
    dry_run: bool,

    /// Compare destination content with the source after deploying
    #[arg(long)]
    verify: bool,

    /// Do not print the destination tree
    #[arg(long)]
    no_tree: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable progress and tree
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            match format {
                OutputFormat::Table => println!("❌ Error: {err:#}"),
                OutputFormat::Json => {
                    if output::print_json(&output::error_json(&err)).is_err() {
                        println!("❌ Error: {err:#}");
                    }
                }
            }
            ExitCode::from(1)
        }
    }
}

/// Returns `Ok(false)` when the run completed but verification failed.
fn run(cli: Cli) -> Result<bool> {
    let project_root =
        std::env::current_dir().context("Failed to determine current directory")?;
    let home = home_dir()?;

    let store = match cli.config {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::for_project(&project_root),
    };
    let overrides = DeployConfig {
        source_root: cli.source,
        destination_root: cli.dest,
        verify: cli.verify.then_some(true),
    };
    let config = store.load()?.merged_with(overrides);
    let ctx = DeployContext::resolve(&project_root, &home, &config);
    tracing::debug!(
        config = %store.config_path().display(),
        source = %ctx.source_root().display(),
        destination = %ctx.destination_root().display(),
        "resolved paths"
    );

    let plan = plan(&ctx)?;

    if cli.dry_run {
        match cli.format {
            OutputFormat::Table => output::print_plan_table(&plan),
            OutputFormat::Json => output::print_json(&plan)?,
        }
        return Ok(true);
    }

    let table = cli.format == OutputFormat::Table;
    if table {
        output::print_start_banner();
    }

    let mut observer = ConsoleObserver::new(table);
    let report = execute(&ctx, &plan, &mut observer)?;

    match cli.format {
        OutputFormat::Table => output::print_report_table(&report, !cli.no_tree),
        OutputFormat::Json => output::print_json(&report)?,
    }

    Ok(!report.verification_failed())
}
