//! Ranking trips by a named numeric metric.
//!
//! The ranking layer resolves a metric name to a field accessor, turns it into a
//! comparator and hands the trips to [`TopKSelector`]. Results come back in
//! selection order; callers that want them sorted sort them themselves.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::selection::{checked_k, SelectorConfig, TopKSelector};
use crate::trip::TripRecord;

pub const DEFAULT_METRIC: TripMetric = TripMetric::AverageSpeed;
pub const DEFAULT_K: usize = 10;

/// Numeric trip fields trips can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMetric {
    AverageSpeed,
    TripDistance,
    TripDuration,
    PassengerCount,
    HourOfDay,
    DayOfWeek,
}

impl TripMetric {
    pub const ALL: [TripMetric; 6] = [
        TripMetric::AverageSpeed,
        TripMetric::TripDistance,
        TripMetric::TripDuration,
        TripMetric::PassengerCount,
        TripMetric::HourOfDay,
        TripMetric::DayOfWeek,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AverageSpeed => "average_speed",
            Self::TripDistance => "trip_distance",
            Self::TripDuration => "trip_duration",
            Self::PassengerCount => "passenger_count",
            Self::HourOfDay => "hour_of_day",
            Self::DayOfWeek => "day_of_week",
        }
    }

    pub fn value(self, trip: &TripRecord) -> f64 {
        match self {
            Self::AverageSpeed => trip.average_speed,
            Self::TripDistance => trip.trip_distance,
            Self::TripDuration => f64::from(trip.trip_duration),
            Self::PassengerCount => f64::from(trip.passenger_count),
            Self::HourOfDay => f64::from(trip.hour_of_day),
            Self::DayOfWeek => f64::from(trip.day_of_week),
        }
    }
}

impl fmt::Display for TripMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TripMetric {
    type Err = SelectionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.name() == name)
            .ok_or_else(|| SelectionError::UnknownMetric(name.to_string()))
    }
}

/// Which end of the metric counts as "top".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    #[default]
    Highest,
    Lowest,
}

/// Compare two metric values so the preferred one is `Greater`.
///
/// NaN never ranks ahead of a number, whichever direction is requested.
pub fn compare_values(a: f64, b: f64, direction: RankDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match direction {
            RankDirection::Highest => a.total_cmp(&b),
            RankDirection::Lowest => b.total_cmp(&a),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTripsQuery {
    pub metric: TripMetric,
    pub k: usize,
    #[serde(default)]
    pub direction: RankDirection,
}

impl Default for TopTripsQuery {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC,
            k: DEFAULT_K,
            direction: RankDirection::Highest,
        }
    }
}

impl TopTripsQuery {
    pub fn new(metric: TripMetric, k: usize) -> Self {
        Self {
            metric,
            k,
            ..Default::default()
        }
    }

    /// Build a query from loosely typed request parameters.
    ///
    /// A missing metric means `average_speed`. A missing or non-numeric `k`
    /// means 10, but a negative `k` is an error.
    pub fn from_raw(metric: Option<&str>, k: Option<&str>) -> Result<Self, SelectionError> {
        let metric = match metric.map(str::trim).filter(|m| !m.is_empty()) {
            Some(name) => name.parse()?,
            None => DEFAULT_METRIC,
        };
        let k = match k.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            Some(k) => checked_k(k)?,
            None => DEFAULT_K,
        };
        Ok(Self::new(metric, k))
    }

    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn compare(&self, a: &TripRecord, b: &TripRecord) -> Ordering {
        compare_values(self.metric.value(a), self.metric.value(b), self.direction)
    }
}

/// Select the top trips for `query` from a private copy of `trips`.
pub fn rank_trips(
    trips: &[TripRecord],
    query: &TopTripsQuery,
    config: SelectorConfig,
) -> Vec<TripRecord> {
    let mut selector = TopKSelector::new(config);
    selector.select_owned(trips.to_vec(), query.k, |a, b| query.compare(a, b))
}

/// In-place variant of [`rank_trips`] for callers that already own a scratch buffer.
pub fn rank_trips_in_place<'a>(
    trips: &'a mut [TripRecord],
    query: &TopTripsQuery,
    selector: &mut TopKSelector,
) -> &'a mut [TripRecord] {
    selector.select(trips, query.k, |a, b| query.compare(a, b))
}
