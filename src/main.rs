use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cykel_insights::commands::{self, Report};
use cykel_insights::{dates, storage, CycleEngine, Settings};

/// Derive tracker insights from an exported log snapshot
#[derive(Parser)]
#[command(name = "cykel-insights")]
#[command(about = "Cycle statistics, calendar tags and trends from logged periods", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Snapshot JSON file (defaults to the local data directory)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Day to compute for, YYYY-MM-DD (defaults to the local date)
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Fail on unreadable records instead of dropping them
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Everything the tracker page shows
    Dashboard,
    /// Summary statistics and card text
    Stats,
    /// Day tags for one month
    Calendar {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Cycle and period length chart series
    Trends,
    /// Report entries that were excluded or flagged
    Validate,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    dates::parse_iso(s).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.clone()).context("loading configuration")?;
    init_logging(&settings.log_level);

    let path = match cli.snapshot {
        Some(path) => path,
        None => storage::default_snapshot_path()?,
    };
    let snapshot = storage::load(&path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let inputs = commands::ingest(snapshot, cli.strict)?;

    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let report = match cli.command {
        Commands::Dashboard => Report::Dashboard,
        Commands::Stats => Report::Stats,
        Commands::Calendar { year, month } => Report::Calendar { year, month },
        Commands::Trends => Report::Trends,
        Commands::Validate => Report::Validate,
    };

    tracing::info!(?report, %today, snapshot = %path.display(), "running report");
    let engine = CycleEngine::new(settings.engine);
    println!("{}", commands::run(&report, &inputs, today, &engine)?);
    Ok(())
}
