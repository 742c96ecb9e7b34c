//! eafeed CLI: query adjusted bars and inspect the symbol universe.
//!
//! Commands:
//! - `query`: fetch bars for one symbol and print them as a table, CSV or JSON
//! - `symbols`: list the symbols the datafeed can serve

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eafeed_core::data::{DatasetSource, HubSource, LocalSource};
use eafeed_core::datafeed::{Datafeed, EdArchimbaudDatafeed};
use eafeed_core::domain::{BarData, Exchange, HistoryRequest, Interval};
use eafeed_core::settings::{DatafeedSettings, FetchFailurePolicy};

#[derive(Parser)]
#[command(
    name = "eafeed",
    version,
    about = "Adjusted historical stock bars from the edarchimbaud datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query historical bars for one symbol.
    Query {
        /// Ticker symbol (e.g., AAPL).
        #[arg(long)]
        symbol: String,

        /// Exchange the symbol trades on.
        #[arg(long, default_value = "NASDAQ")]
        exchange: Exchange,

        /// Bar interval: d or 1m.
        #[arg(long)]
        interval: Interval,

        /// Start (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"), inclusive.
        #[arg(long)]
        start: String,

        /// End (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"), inclusive.
        #[arg(long)]
        end: String,

        /// Path to a TOML settings file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read datasets from a local parquet mirror instead of the hub.
        #[arg(long)]
        local_dir: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Report time-series fetch failures instead of failing the command.
        #[arg(long, default_value_t = false)]
        report_fetch_errors: bool,
    },
    /// List the symbol universe.
    Symbols {
        /// Path to a TOML settings file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read datasets from a local parquet mirror instead of the hub.
        #[arg(long)]
        local_dir: Option<PathBuf>,

        /// Only list symbols starting with this prefix.
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

/// Flat CSV row; `csv` cannot serialize the nested timezone-aware datetime.
#[derive(Serialize)]
struct CsvBar<'a> {
    symbol: &'a str,
    exchange: &'a str,
    interval: &'a str,
    datetime: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    turnover: f64,
    open_interest: f64,
    gateway: &'a str,
}

impl<'a> From<&'a BarData> for CsvBar<'a> {
    fn from(bar: &'a BarData) -> Self {
        Self {
            symbol: &bar.symbol,
            exchange: bar.exchange.as_str(),
            interval: bar.interval.value(),
            datetime: bar.datetime.to_rfc3339(),
            open: bar.open_price,
            high: bar.high_price,
            low: bar.low_price,
            close: bar.close_price,
            volume: bar.volume,
            turnover: bar.turnover,
            open_interest: bar.open_interest,
            gateway: &bar.gateway_name,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            symbol,
            exchange,
            interval,
            start,
            end,
            config,
            local_dir,
            format,
            report_fetch_errors,
        } => {
            let mut settings = load_settings(config)?;
            if report_fetch_errors {
                settings.fetch_failure = FetchFailurePolicy::Report;
            }
            let request = HistoryRequest::new(
                symbol,
                exchange,
                interval,
                parse_datetime(&start)?,
                parse_datetime(&end)?,
            );
            run_query(settings, local_dir, &request, format)
        }
        Commands::Symbols {
            config,
            local_dir,
            filter,
        } => run_symbols(load_settings(config)?, local_dir, filter.as_deref()),
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<DatafeedSettings> {
    match path {
        Some(path) => DatafeedSettings::from_file(&path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(DatafeedSettings::default()),
    }
}

fn build_feed(
    settings: DatafeedSettings,
    local_dir: Option<PathBuf>,
) -> Result<EdArchimbaudDatafeed<Box<dyn DatasetSource>>> {
    let source: Box<dyn DatasetSource> = match local_dir {
        Some(dir) => {
            let local = LocalSource::new(dir);
            info!(root = %local.root().display(), "reading local parquet mirror");
            Box::new(local)
        }
        None => Box::new(HubSource::new(&settings.hub, &settings.credentials)?),
    };
    info!(source = source.name(), "datafeed ready");
    Ok(EdArchimbaudDatafeed::new(source, settings))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date '{s}'"))
}

fn run_query(
    settings: DatafeedSettings,
    local_dir: Option<PathBuf>,
    request: &HistoryRequest,
    format: Format,
) -> Result<()> {
    let feed = build_feed(settings, local_dir)?;

    let reported = Cell::new(false);
    let sink = |msg: &str| {
        reported.set(true);
        eprintln!("{msg}");
    };

    let bars = feed.query_bar_history(request, &sink)?;
    if reported.get() {
        std::process::exit(1);
    }

    match format {
        Format::Table => print_table(&bars),
        Format::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            for bar in &bars {
                writer.serialize(CsvBar::from(bar))?;
            }
            writer.flush()?;
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&bars)?),
    }

    Ok(())
}

fn print_table(bars: &[BarData]) {
    if bars.is_empty() {
        println!("No bars.");
        return;
    }

    println!(
        "{:<27} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Datetime", "Open", "High", "Low", "Close", "Volume"
    );
    println!("{}", "-".repeat(94));
    for bar in bars {
        println!(
            "{:<27} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>14.0}",
            bar.datetime.to_rfc3339(),
            bar.open_price,
            bar.high_price,
            bar.low_price,
            bar.close_price,
            bar.volume
        );
    }
    println!();
    println!("{} bars for {}", bars.len(), bars[0].vt_symbol());
}

fn run_symbols(
    settings: DatafeedSettings,
    local_dir: Option<PathBuf>,
    filter: Option<&str>,
) -> Result<()> {
    let feed = build_feed(settings, local_dir)?;

    let sink = |msg: &str| eprintln!("{msg}");
    if !feed.init(&sink) {
        std::process::exit(1);
    }

    let Some(universe) = feed.symbols() else {
        std::process::exit(1);
    };

    let prefix = filter.unwrap_or("");
    let mut count = 0;
    for symbol in universe.iter().filter(|s| s.starts_with(prefix)) {
        println!("{symbol}");
        count += 1;
    }
    info!(listed = count, total = universe.len(), "symbols listed");

    Ok(())
}
