use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use trip_analytics::{
    export_exclusions_json, export_trips_csv, export_trips_parquet, ingest_csv, load_cleaned_csv,
    parse_zone_resolution, AnalyticsError, CleaningConfig, DateRange, PassengerFilter, Result,
    TripFilter, TripStore,
};
use trip_core::ranking::{RankDirection, TopTripsQuery};
use trip_core::selection::{PivotRule, SelectorConfig};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "trip-analytics",
    about = "Clean, query and rank taxi trip data",
    long_about = "Loads a taxi trip CSV (raw or previously cleaned), then prints\n\
                  listings, dashboard statistics or top-K rankings as JSON."
)]
struct Cli {
    /// Trip CSV to load
    #[arg(long, env = "TRIP_DATA", global = true, default_value = "data/train.csv")]
    data: PathBuf,
    /// Treat `--data` as a cleaned CSV written by `clean` instead of raw input
    #[arg(long, global = true)]
    cleaned: bool,
    /// Show a spinner while reading raw rows
    #[arg(long, global = true)]
    progress: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw CSV and write the results
    Clean {
        /// Cleaned trips CSV
        #[arg(long, default_value = "cleaned_taxi_data.csv")]
        output: PathBuf,
        /// Excluded rows with reasons (JSON)
        #[arg(long, default_value = "excluded_records.json")]
        excluded: PathBuf,
        /// Also write cleaned trips as Parquet
        #[arg(long)]
        parquet: Option<PathBuf>,
        /// Maximum plausible average speed (km/h)
        #[arg(long)]
        max_speed_kmh: Option<f64>,
        /// Minimum plausible duration (seconds)
        #[arg(long)]
        min_duration_secs: Option<u32>,
        /// H3 resolution (0-15) for pickup zones
        #[arg(long)]
        zone_resolution: Option<u8>,
    },
    /// Top-K trips by a metric, unordered
    Top {
        /// Metric to rank by
        #[arg(long)]
        metric: Option<String>,
        /// Number of trips (default 10)
        #[arg(long, allow_hyphen_values = true)]
        k: Option<String>,
        /// Rank the smallest values instead of the largest
        #[arg(long)]
        lowest: bool,
        /// Use the deterministic last-element pivot
        #[arg(long)]
        last_pivot: bool,
    },
    /// Dashboard statistics
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Count and average distance/duration over all trips
    Summary,
    /// Filtered, paged trip listing
    Trips {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = trip_analytics::filter::DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Trips flagged as suspect
    Anomalies,
    /// A single trip by id
    Trip { id: String },
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    vendor_id: Option<u8>,
    /// Exact count, or `N+` for at least N. A bare `3` also means 3 or more
    #[arg(long)]
    passengers: Option<String>,
    /// 0 = Sunday
    #[arg(long)]
    day_of_week: Option<u8>,
    #[arg(long)]
    hour_of_day: Option<u8>,
    #[arg(long)]
    min_distance: Option<f64>,
    #[arg(long)]
    max_distance: Option<f64>,
    /// MM/DD/YYYY or YYYY-MM-DD
    #[arg(long, requires = "end_date")]
    start_date: Option<String>,
    #[arg(long, requires = "start_date")]
    end_date: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Result<TripFilter> {
        let mut filter =
            TripFilter::default().with_distance_range(self.min_distance, self.max_distance);
        filter.vendor_id = self.vendor_id;
        filter.day_of_week = self.day_of_week;
        filter.hour_of_day = self.hour_of_day;
        if let Some(raw) = &self.passengers {
            filter = filter.with_passengers(PassengerFilter::parse(raw)?);
        }
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            filter = filter.with_dates(DateRange::parse(start, end)?);
        }
        Ok(filter)
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn cleaning_config(cli: &Cli) -> Result<CleaningConfig> {
    let mut config = CleaningConfig::default().with_progress(cli.progress);
    if let Commands::Clean {
        max_speed_kmh,
        min_duration_secs,
        zone_resolution,
        ..
    } = &cli.command
    {
        if let Some(kmh) = max_speed_kmh {
            config = config.with_max_speed_kmh(*kmh);
        }
        if let Some(secs) = min_duration_secs {
            config = config.with_min_duration_secs(*secs);
        }
        if let Some(level) = zone_resolution {
            config = config.with_zone_resolution(parse_zone_resolution(*level)?);
        }
    }
    Ok(config)
}

fn load_store(cli: &Cli, selector: SelectorConfig) -> Result<TripStore> {
    let trips = if cli.cleaned {
        load_cleaned_csv(&cli.data)?
    } else {
        ingest_csv(&cli.data, &cleaning_config(cli)?)?.trips
    };
    let mut store = TripStore::with_selector(selector);
    store.insert_batch(trips);
    Ok(store)
}

// ── commands ───────────────────────────────────────────────────────

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Clean {
            output,
            excluded,
            parquet,
            ..
        } => {
            let report = ingest_csv(&cli.data, &cleaning_config(cli)?)?;
            export_exclusions_json(&report.excluded, excluded)?;
            if report.trips.is_empty() {
                tracing::warn!(
                    excluded = report.excluded.len(),
                    "every row was excluded, no cleaned trips written"
                );
                return Ok(());
            }
            export_trips_csv(&report.trips, output)?;
            if let Some(path) = parquet {
                export_trips_parquet(&report.trips, path)?;
            }
            tracing::info!(
                cleaned = report.trips.len(),
                excluded = report.excluded.len(),
                output = %output.display(),
                "cleaned trips saved"
            );
            Ok(())
        }
        Commands::Top {
            metric,
            k,
            lowest,
            last_pivot,
        } => {
            let direction = if *lowest {
                RankDirection::Lowest
            } else {
                RankDirection::Highest
            };
            let query =
                TopTripsQuery::from_raw(metric.as_deref(), k.as_deref())?.with_direction(direction);
            let pivot = if *last_pivot {
                PivotRule::Last
            } else {
                PivotRule::Random
            };
            let store = load_store(cli, SelectorConfig::default().with_pivot(pivot))?;
            print_json(&store.top_trips(&query))
        }
        Commands::Stats { filter } => {
            let filter = filter.to_filter()?;
            let store = load_store(cli, SelectorConfig::default())?;
            print_json(&store.dashboard(&filter))
        }
        Commands::Summary => {
            let store = load_store(cli, SelectorConfig::default())?;
            print_json(&store.summary())
        }
        Commands::Trips {
            filter,
            limit,
            offset,
        } => {
            let filter = filter.to_filter()?.with_page(*limit, *offset);
            let store = load_store(cli, SelectorConfig::default())?;
            print_json(&store.query(&filter))
        }
        Commands::Anomalies => {
            let store = load_store(cli, SelectorConfig::default())?;
            print_json(&store.anomalies())
        }
        Commands::Trip { id } => {
            let store = load_store(cli, SelectorConfig::default())?;
            print_json(store.require(id)?)
        }
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AnalyticsError::NotFound(id)) => {
            tracing::error!(%id, "trip not found");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
