//! ELBv2 unhealthy instance scanner.
//!
//! # Architecture Overview
//!
//! ```text
//!   snapshot.json ──▶ cache::SnapshotCache ──┐
//!                                            │
//!   config.toml ───▶ config::load_config     │
//!                        │                   ▼
//!                        │        ┌─────────────────────┐
//!                        └──────▶ │    scan::Scanner     │   one task per region
//!                                 │  (region fan-out)    │
//!                                 └──────────┬──────────┘
//!                                            ▼
//!                                 ┌─────────────────────┐
//!                                 │ rule::Unhealthy...  │   lb → target groups
//!                                 │  evaluate_region    │      → target health
//!                                 └──────────┬──────────┘
//!                                            ▼
//!                                 scan::ScanReport ──▶ stdout (json | text)
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use elbv2_audit::config::validation::validate_regions;
use elbv2_audit::config::{load_config, ConfigError, OutputFormat, ScanConfig};
use elbv2_audit::observability::logging;
use elbv2_audit::{Scanner, SnapshotCache, UnhealthyInstanceRule};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

#[derive(Parser)]
#[command(name = "elbv2-audit")]
#[command(about = "Report Application/Network load balancers with unhealthy targets", long_about = None)]
struct Cli {
    /// Collector cache snapshot (JSON).
    #[arg(short, long)]
    cache: PathBuf,

    /// Scan configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Region to evaluate; repeat to evaluate several. Overrides the config.
    #[arg(short, long = "region")]
    regions: Vec<String>,

    /// Report format. Overrides the config.
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Include the cache lookups behind each finding.
    #[arg(long)]
    include_sources: bool,

    /// Exit with status 2 when any load balancer fails the check.
    #[arg(long)]
    fail_on_findings: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScanConfig::default(),
    };

    if !cli.regions.is_empty() {
        let errors = validate_regions(&cli.regions);
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors).into());
        }
        config.regions.regions = cli.regions.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    config.output.include_sources |= cli.include_sources;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "elbv2-audit starting");

    let cache = SnapshotCache::load_from_file(&cli.cache)?;
    let rule = UnhealthyInstanceRule::new()
        .with_parallel_load_balancers(config.evaluation.parallel_load_balancers);

    let scanner = Scanner::new(Arc::new(rule), Arc::new(cache), config.evaluation.clone())
        .with_metrics(config.observability.metrics_enabled);

    let mut report = scanner.scan(&config.regions.regions).await?;
    if !config.output.include_sources {
        report = report.without_sources();
    }

    match config.output.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.render_text()),
    }

    if cli.fail_on_findings && report.has_failures() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
