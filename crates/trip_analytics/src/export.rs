//! Export of cleaned trips and exclusions.
//!
//! Cleaned trips can be written as CSV (readable back with
//! [`load_cleaned_csv`](crate::ingest::load_cleaned_csv)), JSON or Parquet.
//! Excluded rows are written as pretty JSON for manual inspection.

use std::path::Path;

use trip_core::trip::TripRecord;

use crate::cleaning::Exclusion;
use crate::error::Result;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export cleaned trips to CSV, one row per trip with a header.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyExport`](crate::error::AnalyticsError::EmptyExport)
/// for an empty slice, or the underlying I/O or CSV error.
pub fn export_trips_csv(trips: &[TripRecord], path: impl AsRef<Path>) -> Result<()> {
    writer_utils::ensure_not_empty(trips)?;
    let file = writer_utils::create_output_file(path.as_ref())?;
    csv::export_trips_csv_impl(trips, file)
}

/// Export cleaned trips to a JSON array.
pub fn export_trips_json(trips: &[TripRecord], path: impl AsRef<Path>) -> Result<()> {
    let file = writer_utils::create_output_file(path.as_ref())?;
    json::export_json_impl(trips, file)
}

/// Export cleaned trips to Parquet.
///
/// Timestamps are stored as seconds since the Unix epoch (naive, no time zone).
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyExport`](crate::error::AnalyticsError::EmptyExport)
/// for an empty slice, or the underlying Arrow/Parquet error.
pub fn export_trips_parquet(trips: &[TripRecord], path: impl AsRef<Path>) -> Result<()> {
    writer_utils::ensure_not_empty(trips)?;
    let file = writer_utils::create_output_file(path.as_ref())?;
    parquet::export_trips_parquet_impl(trips, file)
}

/// Export excluded rows with their reasons to a JSON array.
pub fn export_exclusions_json(excluded: &[Exclusion], path: impl AsRef<Path>) -> Result<()> {
    let file = writer_utils::create_output_file(path.as_ref())?;
    json::export_json_impl(excluded, file)
}
