use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;

use healthcare_analytics::config::DashboardConfig;
use healthcare_analytics::dashboard::{Choice, Dashboard, FilterSelection, View};
use healthcare_analytics::ingestion::{IngestionOptions, LogObserver};

#[derive(Parser)]
#[command(name = "healthcare-dashboard")]
#[command(author, version, about = "Filtered aggregates over patient encounter data", long_about = None)]
struct Cli {
    /// Encounter file (.csv, .json, .ndjson, .parquet)
    #[arg(short, long)]
    data: PathBuf,

    /// JSON file overriding dashboard settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// View to compute: overview, demographic, clinical or financial
    #[arg(short, long, default_value = "overview")]
    view: View,

    /// First admission date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    from: Option<NaiveDate>,

    /// Last admission date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    to: Option<NaiveDate>,

    /// Gender to keep ("All" keeps everyone)
    #[arg(long)]
    gender: Option<String>,

    /// Hospital to keep (financial view only)
    #[arg(long)]
    hospital: Option<String>,

    /// Print the available filter values instead of a view
    #[arg(long)]
    options: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let options = IngestionOptions {
        observer: Some(Arc::new(LogObserver)),
        ..IngestionOptions::default()
    };
    let dashboard = Dashboard::load(&cli.data, &options, config)
        .with_context(|| format!("loading {}", cli.data.display()))?;

    if cli.options {
        return print_json(&dashboard.filter_options()?, cli.pretty);
    }

    let selection = FilterSelection {
        admitted_from: cli.from,
        admitted_to: cli.to,
        gender: Choice::from_option(cli.gender.as_deref()),
        hospital: Choice::from_option(cli.hospital.as_deref()),
    };
    let report = dashboard
        .render(cli.view, &selection)
        .with_context(|| format!("computing {} view", cli.view))?;
    if report.no_data() {
        log::warn!("no encounters match the selected filters");
    }
    print_json(&report, cli.pretty)
}
