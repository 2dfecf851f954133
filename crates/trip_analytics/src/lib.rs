//! Taxi trip analytics: ingestion, storage, statistics and ranking.
//!
//! This crate turns a raw taxi-trip CSV into a queryable in-memory store and
//! answers the questions a trip dashboard asks of it.
//!
//! # Quick Start
//!
//! ```no_run
//! use trip_analytics::{ingest_csv, CleaningConfig, TripStore};
//! use trip_core::ranking::{TopTripsQuery, TripMetric};
//!
//! let report = ingest_csv("data/train.csv", &CleaningConfig::default()).unwrap();
//! let store = TripStore::from_trips(report.trips);
//!
//! // Ten fastest trips, in no particular order
//! let fastest = store.top_trips(&TopTripsQuery::new(TripMetric::AverageSpeed, 10));
//! ```
//!
//! # Architecture
//!
//! - [`cleaning`]: Row validation, exclusion reasons, derived features, suspect flags
//! - [`ingest`]: CSV reading and parallel cleaning using rayon
//! - [`store`]: In-memory trip store with id dedupe, listings and rankings
//! - [`filter`]: Listing/dashboard filters (vendor, time, distance, passengers, dates)
//! - [`stats`]: Summary and dashboard aggregates
//! - [`export`]: CSV/JSON/Parquet output

pub mod cleaning;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod stats;
pub mod store;

pub use cleaning::{clean_row, CleaningReport, Exclusion, ExclusionReason, RawTripRow};
pub use config::{parse_zone_resolution, CleaningConfig};
pub use error::{AnalyticsError, Result};
pub use export::{export_exclusions_json, export_trips_csv, export_trips_json, export_trips_parquet};
pub use filter::{DateRange, PassengerFilter, TripFilter};
pub use ingest::{ingest_csv, ingest_reader, load_cleaned_csv};
pub use stats::{DashboardStats, TripSummary};
pub use store::TripStore;
