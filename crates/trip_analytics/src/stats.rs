//! Aggregate statistics for trip listings and the dashboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trip_core::trip::TripRecord;

/// Trips shorter than this are "short" (10 minutes).
const SHORT_TRIP_SECS: u32 = 600;
/// Trips at least this long are "long" (30 minutes).
const LONG_TRIP_SECS: u32 = 1800;

/// Headline numbers over a set of trips. Averages are `None` for no trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_trips: usize,
    pub avg_distance: Option<f64>,
    pub avg_duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDistribution {
    #[serde(rename = "1")]
    pub one: u64,
    #[serde(rename = "2")]
    pub two: u64,
    #[serde(rename = "3")]
    pub three: u64,
    #[serde(rename = "4")]
    pub four: u64,
    #[serde(rename = "5+")]
    pub five_plus: u64,
}

impl PassengerDistribution {
    fn record(&mut self, passengers: u32) {
        match passengers {
            0 => {}
            1 => self.one += 1,
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            _ => self.five_plus += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationDistribution {
    pub short: u64,
    pub medium: u64,
    pub long: u64,
}

impl DurationDistribution {
    fn record(&mut self, duration_secs: u32) {
        if duration_secs < SHORT_TRIP_SECS {
            self.short += 1;
        } else if duration_secs < LONG_TRIP_SECS {
            self.medium += 1;
        } else {
            self.long += 1;
        }
    }
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_trips: usize,
    /// Rounded to one decimal.
    pub avg_passengers: f64,
    /// Whole minutes, rounded down.
    pub avg_duration_minutes: u64,
    /// Whole minutes, rounded down.
    pub longest_trip_minutes: u64,
    /// Counts for vendors 1 and 2; other vendor ids are not reported.
    pub vendor_distribution: BTreeMap<u8, u64>,
    pub passenger_distribution: PassengerDistribution,
    pub duration_distribution: DurationDistribution,
    /// Trips per pickup hour, index 0 = midnight.
    pub hourly_distribution: [u64; 24],
}

pub fn summarize<'a, I>(trips: I) -> TripSummary
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let (count, distance, duration) = trips
        .into_iter()
        .fold((0usize, 0.0f64, 0.0f64), |(count, distance, duration), trip| {
            (
                count + 1,
                distance + trip.trip_distance,
                duration + f64::from(trip.trip_duration),
            )
        });

    let average = |total: f64| (count > 0).then(|| total / count as f64);
    TripSummary {
        total_trips: count,
        avg_distance: average(distance),
        avg_duration: average(duration),
    }
}

pub fn dashboard_stats<'a, I>(trips: I) -> DashboardStats
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut total_trips = 0usize;
    let mut passengers_sum = 0u64;
    let mut duration_sum = 0u64;
    let mut longest = 0u32;
    let mut vendor_distribution = BTreeMap::from([(1u8, 0u64), (2u8, 0u64)]);
    let mut passenger_distribution = PassengerDistribution::default();
    let mut duration_distribution = DurationDistribution::default();
    let mut hourly_distribution = [0u64; 24];

    for trip in trips {
        total_trips += 1;
        passengers_sum += u64::from(trip.passenger_count);
        duration_sum += u64::from(trip.trip_duration);
        longest = longest.max(trip.trip_duration);

        if let Some(count) = vendor_distribution.get_mut(&trip.vendor_id) {
            *count += 1;
        }
        passenger_distribution.record(trip.passenger_count);
        duration_distribution.record(trip.trip_duration);
        if let Some(slot) = hourly_distribution.get_mut(usize::from(trip.hour_of_day)) {
            *slot += 1;
        }
    }

    let (avg_passengers, avg_duration_minutes) = if total_trips == 0 {
        (0.0, 0)
    } else {
        let avg_passengers = passengers_sum as f64 / total_trips as f64;
        (
            (avg_passengers * 10.0).round() / 10.0,
            duration_sum / total_trips as u64 / 60,
        )
    };

    DashboardStats {
        total_trips,
        avg_passengers,
        avg_duration_minutes,
        longest_trip_minutes: u64::from(longest / 60),
        vendor_distribution,
        passenger_distribution,
        duration_distribution,
        hourly_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_core::test_helpers::sample_trip;

    fn trip(id: &str, vendor: u8, passengers: u32, duration: u32, hour: u8) -> TripRecord {
        let mut trip = sample_trip(id, 20.0);
        trip.vendor_id = vendor;
        trip.passenger_count = passengers;
        trip.trip_duration = duration;
        trip.hour_of_day = hour;
        trip
    }

    #[test]
    fn summary_of_nothing_has_no_averages() {
        let summary = summarize(std::iter::empty());
        assert_eq!(summary.total_trips, 0);
        assert_eq!(summary.avg_distance, None);
        assert_eq!(summary.avg_duration, None);
    }

    #[test]
    fn summary_averages_distance_and_duration() {
        let trips = vec![trip("a", 1, 1, 300, 8), trip("b", 1, 1, 900, 9)];
        let summary = summarize(&trips);
        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.avg_distance, Some(2.0));
        assert_eq!(summary.avg_duration, Some(600.0));
    }

    #[test]
    fn dashboard_buckets() {
        let trips = vec![
            trip("a", 1, 1, 599, 0),
            trip("b", 2, 2, 600, 0),
            trip("c", 2, 6, 1799, 23),
            trip("d", 3, 5, 1800, 12),
            trip("e", 1, 0, 3725, 12),
        ];
        let stats = dashboard_stats(&trips);
        assert_eq!(stats.total_trips, 5);
        assert_eq!(stats.avg_passengers, 2.8);
        assert_eq!(stats.avg_duration_minutes, (599 + 600 + 1799 + 1800 + 3725) / 5 / 60);
        assert_eq!(stats.longest_trip_minutes, 62);
        assert_eq!(stats.vendor_distribution, BTreeMap::from([(1, 2), (2, 2)]));
        assert_eq!(
            stats.passenger_distribution,
            PassengerDistribution {
                one: 1,
                two: 1,
                three: 0,
                four: 0,
                five_plus: 2,
            }
        );
        assert_eq!(
            stats.duration_distribution,
            DurationDistribution {
                short: 1,
                medium: 2,
                long: 2,
            }
        );
        assert_eq!(stats.hourly_distribution[0], 2);
        assert_eq!(stats.hourly_distribution[12], 2);
        assert_eq!(stats.hourly_distribution[23], 1);
    }

    #[test]
    fn dashboard_of_nothing_is_zeroed() {
        let stats = dashboard_stats(std::iter::empty());
        assert_eq!(stats.total_trips, 0);
        assert_eq!(stats.avg_passengers, 0.0);
        assert_eq!(stats.vendor_distribution, BTreeMap::from([(1, 0), (2, 0)]));
    }

    #[test]
    fn passenger_distribution_serializes_with_bucket_keys() {
        let json = serde_json::to_value(PassengerDistribution::default()).unwrap();
        assert!(json.get("5+").is_some());
    }
}
