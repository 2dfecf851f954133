//! CSV ingestion: raw rows in, cleaned trips and exclusions out.
//!
//! Rows are read sequentially with the `csv` crate, then cleaned in parallel
//! with rayon. Output order always matches input order.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use trip_core::spatial::GeoIndex;
use trip_core::trip::TripRecord;

use crate::cleaning::{clean_row_with, CleaningReport, RawTripRow};
use crate::config::CleaningConfig;
use crate::error::Result;

const PROGRESS_TICK_ROWS: u64 = 10_000;

/// Read and clean a raw trip CSV file.
pub fn ingest_csv(path: impl AsRef<Path>, config: &CleaningConfig) -> Result<CleaningReport> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading raw trip csv");
    let file = File::open(path)?;
    ingest_reader(file, config)
}

/// Read and clean raw trip CSV data from any reader.
pub fn ingest_reader<R: Read>(reader: R, config: &CleaningConfig) -> Result<CleaningReport> {
    let rows = read_raw_rows(reader, config.show_progress)?;
    let geo = GeoIndex::new(config.zone_resolution);

    let outcomes: Vec<_> = rows
        .into_par_iter()
        .map(|row| clean_row_with(row, config, &geo))
        .collect();
    let report: CleaningReport = outcomes.into_iter().collect();

    tracing::info!(
        rows = report.total_rows(),
        cleaned = report.trips.len(),
        excluded = report.excluded.len(),
        suspect = report.suspect_count(),
        "cleaned trip rows"
    );
    Ok(report)
}

fn read_raw_rows<R: Read>(reader: R, show_progress: bool) -> Result<Vec<RawTripRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let progress = show_progress.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} rows read")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    });

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<RawTripRow>() {
        rows.push(row?);
        if let Some(bar) = &progress {
            if rows.len() as u64 % PROGRESS_TICK_ROWS == 0 {
                bar.set_position(rows.len() as u64);
            }
        }
    }

    if let Some(bar) = progress {
        bar.finish_with_message(format!("{} rows read", rows.len()));
    }
    Ok(rows)
}

/// Load trips previously written by [`export_trips_csv`](crate::export::export_trips_csv).
pub fn load_cleaned_csv(path: impl AsRef<Path>) -> Result<Vec<TripRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let trips = reader
        .deserialize::<TripRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    tracing::info!(path = %path.display(), trips = trips.len(), "loaded cleaned trips");
    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,vendor_id,pickup_datetime,dropoff_datetime,passenger_count,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,store_and_fwd_flag,trip_duration
id2875421,2,2016-03-14 17:24:55,2016-03-14 17:32:30,1,-73.982154846191406,40.767936706542969,-73.964630126953125,40.765602111816406,N,455
id2377394,1,2016-06-12 00:43:35,2016-06-12 00:54:38,1,-73.980415344238281,40.738563537597656,-73.999481201171875,40.731151580810547,N,663
,1,2016-01-19 11:35:24,2016-01-19 12:10:48,1,-73.979026794433594,40.763938903808594,-74.005332946777344,40.710086822509766,N,2124
id3504673,2,2016-04-06 19:32:31,2016-04-06 19:39:40,1,-74.010040283203125,40.719970703125,-74.012268066406250,40.706718444824219,Y,429
";

    #[test]
    fn ingest_keeps_order_and_reports_exclusions() {
        let report = ingest_reader(SAMPLE.as_bytes(), &CleaningConfig::default()).unwrap();
        let ids: Vec<&str> = report.trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["id2875421", "id2377394", "id3504673"]);
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.excluded[0].row.trip_duration, "2124");
    }

    #[test]
    fn missing_columns_become_exclusions() {
        let csv = "id,vendor_id\nabc,1\n";
        let report = ingest_reader(csv.as_bytes(), &CleaningConfig::default()).unwrap();
        assert!(report.trips.is_empty());
        assert_eq!(report.excluded.len(), 1);
    }
}
