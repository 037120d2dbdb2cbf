//! Knox test command line tool.
//!
//! Runs the Knox space-time interaction test on one or more indexed points
//! JSON files (`[[id, "date", [x, y]], ...]`) and prints the counts and the
//! statistic for each.
//!
//! # Usage
//!
//! ```bash
//! knox --dist 1800 --time 16 data/month.json data/year.json
//! knox --config knox.toml --json -v data/month.json
//! ```
//!
//! Without `--config`, the first `knox.toml` found in the current directory,
//! `rust_backend/` or the parent directory is used; `--dist` and `--time`
//! override it.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info; `-v` raises it to debug)

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use knox_rust::algorithms::counting::CountProgress;
use knox_rust::config::KnoxConfig;
use knox_rust::io::loaders::PointLoader;
use knox_rust::services::knox_test::{run_on_store, run_on_store_with_progress, KnoxReport};

/// Knox space-time interaction test
#[derive(Parser, Debug)]
#[command(name = "knox")]
#[command(version)]
#[command(about = "Knox test for space-time clustering of dated point events")]
struct Cli {
    /// Spatial threshold in projection units (default 1800)
    #[arg(long = "dist")]
    dist: Option<f64>,

    /// Temporal threshold in days (default 16)
    #[arg(long = "time")]
    time: Option<i64>,

    /// TOML configuration file with a [knox] table (default: knox.toml in
    /// the current, rust_backend/ or parent directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output: debug logging and counting progress
    #[arg(short, long)]
    verbose: bool,

    /// Indexed points JSON files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_level),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    info!(
        "Using d_max={} t_max={} days",
        config.d_max, config.t_max
    );

    for path in &cli.files {
        let report = analyze_file(path, &config, cli.verbose)
            .with_context(|| format!("Knox test failed for {}", path.display()))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(path, &report);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<KnoxConfig> {
    let mut config = match &cli.config {
        Some(path) => KnoxConfig::from_file(path)?,
        None => KnoxConfig::from_default_location_or_default()?,
    };
    if let Some(dist) = cli.dist {
        config = config.with_d_max(dist);
    }
    if let Some(time) = cli.time {
        config = config.with_t_max(time);
    }
    config.validate()?;
    Ok(config)
}

fn analyze_file(path: &Path, config: &KnoxConfig, verbose: bool) -> anyhow::Result<KnoxReport> {
    let store = PointLoader::load_from_file(path)?.into_store()?;

    let report = if verbose {
        let on_progress = |p: CountProgress| {
            info!(
                "{} / {} features complete ({:.1}%), time elapsed: {:.1?}",
                p.completed,
                p.total,
                p.fraction() * 100.0,
                p.elapsed
            );
        };
        run_on_store_with_progress(&store, config, &on_progress)?
    } else {
        run_on_store(&store, config)?
    };

    Ok(report)
}

fn print_report(path: &Path, report: &KnoxReport) {
    let counts = &report.counts;
    let stat = &report.statistic;

    println!("\n{}", path.display());
    println!("\nCounts:");
    println!("Ns:  {}", counts.ns);
    println!("N2s: {}", counts.n2s);
    println!("Nt:  {}", counts.nt);
    println!("N2t: {}", counts.n2t);
    println!("X:   {}", counts.x);
    println!("n:   {}", report.n);

    println!("\nStatistics:");
    println!("N:   {}", stat.n_pairs);
    println!("E:   {}", stat.expected);
    println!("V:   {}", stat.variance);
    println!("Std: {}", stat.std_dev);

    println!("\nZ-score:");
    println!("Z:   {}", stat.z_score);
}
