#![allow(dead_code)]

use trip_core::ranking::TripMetric;
use trip_core::trip::TripRecord;

/// Metric values of `trips`, sorted descending, for multiset comparisons.
pub fn metric_values_desc(trips: &[TripRecord], metric: TripMetric) -> Vec<f64> {
    let mut values: Vec<f64> = trips.iter().map(|t| metric.value(t)).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values
}

/// The k largest values of `metric` obtained by a full sort.
pub fn reference_top(trips: &[TripRecord], metric: TripMetric, k: usize) -> Vec<f64> {
    let mut values = metric_values_desc(trips, metric);
    values.truncate(k);
    values
}
