use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use bike_rental_report::currency::{Currency, Locale};
use bike_rental_report::{
    charts, config, report, Dashboard, Dataset, DateRange, Explorer, Settings,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bike-rental-report")]
#[command(about = "Explore daily bike rentals by date range", long_about = None)]
struct Cli {
    /// Dataset CSV; falls back to BIKE_DATA_PATH, then all_data.csv
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[arg(long, global = true, default_value = "AUD")]
    currency: Currency,
    #[arg(long, global = true, default_value = "es_CO")]
    locale: Locale,
    /// Revenue per rental for the estimated revenue metric
    #[arg(
        long,
        global = true,
        default_value_t = config::DEFAULT_UNIT_PRICE,
        value_parser = config::parse_unit_price
    )]
    unit_price: f64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD); defaults to the earliest day in the data
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD); defaults to the latest day in the data
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for a date range
    Summary {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the dashboard as JSON
    Export {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "dashboard.json")]
        out: PathBuf,
    },
    /// Render SVG charts
    Charts {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,
    },
    /// Read "START END" lines from stdin and print a summary for each
    Explore,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        data_path: Settings::resolve_data_path(cli.data),
        currency: cli.currency,
        locale: cli.locale,
        unit_price: cli.unit_price,
    };

    let dataset = bike_rental_report::load_dataset(&settings.data_path)
        .with_context(|| format!("failed to load dataset {}", settings.data_path.display()))?;
    if let Some((first, last)) = dataset.date_bounds() {
        info!(rows = dataset.len(), %first, %last, "dataset ready");
    } else {
        warn!("dataset has no rows");
    }

    match cli.command {
        Commands::Summary { range } => {
            let dashboard = dashboard_for(&dataset, range, &settings)?;
            print!("{}", report::build_summary(&dashboard));
        }
        Commands::Report { range, out } => {
            let dashboard = dashboard_for(&dataset, range, &settings)?;
            std::fs::write(&out, report::build_report(&dashboard))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { range, out } => {
            let dashboard = dashboard_for(&dataset, range, &settings)?;
            let json = serde_json::to_string_pretty(&dashboard)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Charts { range, out_dir } => {
            let dashboard = dashboard_for(&dataset, range, &settings)?;
            let written = charts::render_charts(&dashboard, &out_dir)?;
            if written.is_empty() {
                println!("No data for this range; no charts written.");
            }
            for path in written {
                println!("Chart written to {}.", path.display());
            }
        }
        Commands::Explore => explore(&dataset, settings)?,
    }

    Ok(())
}

fn dashboard_for(
    dataset: &Dataset,
    range: RangeArgs,
    settings: &Settings,
) -> anyhow::Result<Dashboard> {
    let range = DateRange::resolve(dataset, range.start, range.end)
        .context("dataset is empty; pass both --start and --end")?;
    if range.is_inverted() {
        warn!(%range, "start is after end; the selection is empty");
    }
    Ok(bike_rental_report::build_dashboard(dataset, range, settings))
}

fn explore(dataset: &Dataset, settings: Settings) -> anyhow::Result<()> {
    let mut explorer = Explorer::new(dataset, settings);
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        match line.parse::<DateRange>() {
            Ok(range) => print!("{}", report::build_summary(explorer.dashboard(range))),
            Err(err) => warn!(error = %err, "skipping input"),
        }
    }

    info!(ranges = explorer.cached_ranges(), "explore session finished");
    Ok(())
}
