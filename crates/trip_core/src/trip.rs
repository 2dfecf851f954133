//! Cleaned taxi trip records.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Whether the trip record was held in vehicle memory before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoreAndForward {
    #[serde(rename = "Y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

impl StoreAndForward {
    /// Parses the raw `Y`/`N` column. Anything else, including an empty field,
    /// is treated as `N`.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("y") {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Why a stored trip is flagged as an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspectReason {
    OutsideServiceArea,
    UnknownVendor,
    NoPassengers,
    TooShort,
    ImplausibleSpeed,
    TimestampMismatch,
}

impl fmt::Display for SuspectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutsideServiceArea => "pickup or dropoff outside service area",
            Self::UnknownVendor => "unknown vendor",
            Self::NoPassengers => "no passengers",
            Self::TooShort => "trip too short",
            Self::ImplausibleSpeed => "implausible average speed",
            Self::TimestampMismatch => "dropoff before pickup",
        };
        f.write_str(text)
    }
}

/// A validated trip with derived features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub vendor_id: u8,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    pub passenger_count: u32,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub store_and_fwd_flag: StoreAndForward,
    /// Seconds.
    pub trip_duration: u32,
    /// Kilometres, great-circle between pickup and dropoff.
    pub trip_distance: f64,
    /// km/h.
    pub average_speed: f64,
    pub hour_of_day: u8,
    /// 0 = Sunday.
    pub day_of_week: u8,
    /// H3 cell of the pickup point.
    pub pickup_zone: Option<u64>,
    pub is_suspect: bool,
    pub suspect_reason: Option<SuspectReason>,
}

impl TripRecord {
    pub fn month_of_year(&self) -> u32 {
        self.pickup_datetime.month()
    }

    pub fn is_weekend(&self) -> bool {
        self.day_of_week == 0 || self.day_of_week == 6
    }

    pub fn is_rush_hour(&self) -> bool {
        matches!(self.hour_of_day, 7..=9 | 16..=19)
    }
}

/// Pickup hour (0–23) and weekday (0 = Sunday) of a timestamp.
pub fn time_features(at: NaiveDateTime) -> (u8, u8) {
    let hour = at.hour() as u8;
    let weekday = at.weekday().num_days_from_sunday() as u8;
    (hour, weekday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_trip;

    #[test]
    fn time_features_use_sunday_as_zero() {
        let at = NaiveDateTime::parse_from_str("2016-03-13 17:24:55", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(time_features(at), (17, 0));
    }

    #[test]
    fn month_of_year_follows_pickup_date() {
        let mut trip = sample_trip("a", 10.0);
        assert_eq!(trip.month_of_year(), 3);
        trip.pickup_datetime =
            NaiveDateTime::parse_from_str("2016-12-31 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(trip.month_of_year(), 12);
    }

    #[test]
    fn rush_hour_windows_are_inclusive() {
        let mut trip = sample_trip("a", 10.0);
        trip.hour_of_day = 9;
        assert!(trip.is_rush_hour());
        trip.hour_of_day = 10;
        assert!(!trip.is_rush_hour());
        trip.hour_of_day = 19;
        assert!(trip.is_rush_hour());
    }

    #[test]
    fn weekend_covers_saturday_and_sunday() {
        let mut trip = sample_trip("a", 10.0);
        trip.day_of_week = 6;
        assert!(trip.is_weekend());
        trip.day_of_week = 3;
        assert!(!trip.is_weekend());
    }

    #[test]
    fn store_and_forward_defaults_to_no() {
        assert_eq!(StoreAndForward::from_flag("Y"), StoreAndForward::Yes);
        assert_eq!(StoreAndForward::from_flag(""), StoreAndForward::No);
        assert_eq!(StoreAndForward::from_flag("x"), StoreAndForward::No);
    }
}
