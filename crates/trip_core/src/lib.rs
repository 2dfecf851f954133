//! Core building blocks for taxi trip analytics.
//!
//! - [`selection`]: quickselect-based top-K selection over any slice
//! - [`ranking`]: metric resolution and trip ranking on top of the selector
//! - [`trip`]: the cleaned trip record and its derived time features
//! - [`spatial`]: haversine distance, H3 pickup zones, service-area bounds

pub mod error;
pub mod ranking;
pub mod selection;
pub mod spatial;
pub mod trip;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::SelectionError;
pub use ranking::{rank_trips, RankDirection, TopTripsQuery, TripMetric};
pub use selection::{checked_k, PivotRule, SelectorConfig, TopKSelector};
pub use trip::{StoreAndForward, SuspectReason, TripRecord};
