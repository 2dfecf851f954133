//! Row validation and feature derivation for raw taxi trips.
//!
//! Every raw row ends up in exactly one of two places:
//!
//! - **Excluded**: the row cannot be turned into a trip (missing id or
//!   timestamps, unparseable numbers). It is kept with its reason so it can be
//!   written out for inspection.
//! - **Cleaned**: a [`TripRecord`] with distance, speed, time features and
//!   pickup zone filled in. Rows that parse but fail a plausibility rule are
//!   still cleaned, with `is_suspect` set and the first failing rule recorded.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use trip_core::spatial::{haversine_km, GeoIndex};
use trip_core::trip::{time_features, StoreAndForward, SuspectReason, TripRecord};

use crate::config::CleaningConfig;

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A row of the raw trip CSV, kept as text until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTripRow {
    pub id: String,
    pub vendor_id: String,
    pub pickup_datetime: String,
    pub dropoff_datetime: String,
    pub passenger_count: String,
    pub pickup_longitude: String,
    pub pickup_latitude: String,
    pub dropoff_longitude: String,
    pub dropoff_latitude: String,
    pub store_and_fwd_flag: String,
    pub trip_duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingFields,
    InvalidCoordinates,
    InvalidTimestamp,
    InvalidVendor,
    InvalidPassengerCount,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingFields => "missing/invalid fields",
            Self::InvalidCoordinates => "invalid coordinates",
            Self::InvalidTimestamp => "invalid timestamp",
            Self::InvalidVendor => "invalid vendor id",
            Self::InvalidPassengerCount => "invalid passenger count",
        };
        f.write_str(text)
    }
}

/// A raw row that was rejected, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    #[serde(flatten)]
    pub row: RawTripRow,
    pub reason: ExclusionReason,
}

/// Outcome of cleaning a batch of rows, in input order.
#[derive(Debug, Clone, Default)]
pub struct CleaningReport {
    pub trips: Vec<TripRecord>,
    pub excluded: Vec<Exclusion>,
}

impl CleaningReport {
    pub fn suspect_count(&self) -> usize {
        self.trips.iter().filter(|trip| trip.is_suspect).count()
    }

    pub fn total_rows(&self) -> usize {
        self.trips.len() + self.excluded.len()
    }
}

impl FromIterator<Result<TripRecord, Exclusion>> for CleaningReport {
    fn from_iter<I: IntoIterator<Item = Result<TripRecord, Exclusion>>>(iter: I) -> Self {
        let mut report = CleaningReport::default();
        for outcome in iter {
            match outcome {
                Ok(trip) => report.trips.push(trip),
                Err(exclusion) => report.excluded.push(exclusion),
            }
        }
        report
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Validate one raw row and derive its features.
pub fn clean_row(row: RawTripRow, config: &CleaningConfig) -> Result<TripRecord, Exclusion> {
    let geo = GeoIndex::new(config.zone_resolution);
    clean_row_with(row, config, &geo)
}

pub(crate) fn clean_row_with(
    row: RawTripRow,
    config: &CleaningConfig,
    geo: &GeoIndex,
) -> Result<TripRecord, Exclusion> {
    let exclude = |row: RawTripRow, reason: ExclusionReason| Exclusion { row, reason };

    let trip_duration = row
        .trip_duration
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(|secs| u32::try_from(secs).ok());
    let trip_duration = match trip_duration {
        Some(secs)
            if !row.id.trim().is_empty()
                && !row.pickup_datetime.trim().is_empty()
                && !row.dropoff_datetime.trim().is_empty() =>
        {
            secs
        }
        _ => return Err(exclude(row, ExclusionReason::MissingFields)),
    };

    let coordinates = (
        parse_finite(&row.pickup_latitude),
        parse_finite(&row.pickup_longitude),
        parse_finite(&row.dropoff_latitude),
        parse_finite(&row.dropoff_longitude),
    );
    let (pickup_lat, pickup_lng, dropoff_lat, dropoff_lng) = match coordinates {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return Err(exclude(row, ExclusionReason::InvalidCoordinates)),
    };

    let (pickup, dropoff) = match (
        parse_timestamp(&row.pickup_datetime),
        parse_timestamp(&row.dropoff_datetime),
    ) {
        (Some(pickup), Some(dropoff)) => (pickup, dropoff),
        _ => return Err(exclude(row, ExclusionReason::InvalidTimestamp)),
    };

    let Ok(vendor_id) = row.vendor_id.trim().parse::<u8>() else {
        return Err(exclude(row, ExclusionReason::InvalidVendor));
    };
    let Ok(passenger_count) = row.passenger_count.trim().parse::<u32>() else {
        return Err(exclude(row, ExclusionReason::InvalidPassengerCount));
    };

    let trip_distance = haversine_km(pickup_lat, pickup_lng, dropoff_lat, dropoff_lng);
    let average_speed = trip_distance / (f64::from(trip_duration) / 3600.0);
    let (hour_of_day, day_of_week) = time_features(pickup);
    let pickup_zone = geo.cell_for(pickup_lat, pickup_lng).map(u64::from);

    let mut trip = TripRecord {
        id: row.id.trim().to_string(),
        vendor_id,
        pickup_datetime: pickup,
        dropoff_datetime: dropoff,
        passenger_count,
        pickup_longitude: pickup_lng,
        pickup_latitude: pickup_lat,
        dropoff_longitude: dropoff_lng,
        dropoff_latitude: dropoff_lat,
        store_and_fwd_flag: StoreAndForward::from_flag(&row.store_and_fwd_flag),
        trip_duration,
        trip_distance,
        average_speed,
        hour_of_day,
        day_of_week,
        pickup_zone,
        is_suspect: false,
        suspect_reason: None,
    };

    if let Some(reason) = suspect_reason(&trip, config) {
        trip.is_suspect = true;
        trip.suspect_reason = Some(reason);
    }

    Ok(trip)
}

/// First plausibility rule the trip fails, if any.
pub fn suspect_reason(trip: &TripRecord, config: &CleaningConfig) -> Option<SuspectReason> {
    let area = &config.service_area;
    if !area.contains(trip.pickup_latitude, trip.pickup_longitude)
        || !area.contains(trip.dropoff_latitude, trip.dropoff_longitude)
    {
        return Some(SuspectReason::OutsideServiceArea);
    }
    if !matches!(trip.vendor_id, 1 | 2) {
        return Some(SuspectReason::UnknownVendor);
    }
    if trip.passenger_count < 1 {
        return Some(SuspectReason::NoPassengers);
    }
    if trip.trip_duration < config.min_duration_secs {
        return Some(SuspectReason::TooShort);
    }
    if trip.average_speed > config.max_speed_kmh {
        return Some(SuspectReason::ImplausibleSpeed);
    }
    if trip.dropoff_datetime < trip.pickup_datetime {
        return Some(SuspectReason::TimestampMismatch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawTripRow {
        RawTripRow {
            id: "id2875421".to_string(),
            vendor_id: "2".to_string(),
            pickup_datetime: "2016-03-14 17:24:55".to_string(),
            dropoff_datetime: "2016-03-14 17:32:30".to_string(),
            passenger_count: "1".to_string(),
            pickup_longitude: "-73.982154846191406".to_string(),
            pickup_latitude: "40.767936706542969".to_string(),
            dropoff_longitude: "-73.964630126953125".to_string(),
            dropoff_latitude: "40.765602111816406".to_string(),
            store_and_fwd_flag: "N".to_string(),
            trip_duration: "455".to_string(),
        }
    }

    #[test]
    fn clean_row_derives_features() {
        let trip = clean_row(raw_row(), &CleaningConfig::default()).unwrap();
        assert_eq!(trip.id, "id2875421");
        assert!((trip.trip_distance - 1.4985).abs() < 0.01, "distance {}", trip.trip_distance);
        assert!((trip.average_speed - 11.856).abs() < 0.1, "speed {}", trip.average_speed);
        assert_eq!(trip.hour_of_day, 17);
        assert_eq!(trip.day_of_week, 1);
        assert!(trip.pickup_zone.is_some());
        assert!(!trip.is_suspect);
    }

    #[test]
    fn missing_id_is_excluded() {
        let mut row = raw_row();
        row.id = "  ".to_string();
        let err = clean_row(row, &CleaningConfig::default()).unwrap_err();
        assert_eq!(err.reason, ExclusionReason::MissingFields);
    }

    #[test]
    fn non_positive_duration_is_excluded() {
        for duration in ["0", "-5", "", "abc"] {
            let mut row = raw_row();
            row.trip_duration = duration.to_string();
            let err = clean_row(row, &CleaningConfig::default()).unwrap_err();
            assert_eq!(err.reason, ExclusionReason::MissingFields, "duration {duration:?}");
        }
    }

    #[test]
    fn unparseable_coordinates_are_excluded() {
        let mut row = raw_row();
        row.dropoff_latitude = "north".to_string();
        let err = clean_row(row, &CleaningConfig::default()).unwrap_err();
        assert_eq!(err.reason, ExclusionReason::InvalidCoordinates);
    }

    #[test]
    fn bad_timestamp_is_excluded() {
        let mut row = raw_row();
        row.pickup_datetime = "yesterday".to_string();
        let err = clean_row(row, &CleaningConfig::default()).unwrap_err();
        assert_eq!(err.reason, ExclusionReason::InvalidTimestamp);
    }

    #[test]
    fn iso_timestamps_are_accepted() {
        let mut row = raw_row();
        row.pickup_datetime = "2016-03-14T17:24:55".to_string();
        assert!(clean_row(row, &CleaningConfig::default()).is_ok());
    }

    #[test]
    fn outside_service_area_is_suspect() {
        let mut row = raw_row();
        row.pickup_latitude = "0.0".to_string();
        row.pickup_longitude = "0.0".to_string();
        let trip = clean_row(row, &CleaningConfig::default()).unwrap();
        assert!(trip.is_suspect);
        assert_eq!(trip.suspect_reason, Some(SuspectReason::OutsideServiceArea));
    }

    #[test]
    fn short_trip_is_suspect() {
        let mut row = raw_row();
        row.trip_duration = "30".to_string();
        row.dropoff_datetime = "2016-03-14 17:25:25".to_string();
        let trip = clean_row(row, &CleaningConfig::default()).unwrap();
        // 1.5 km in 30 s is both too short and too fast; the first rule wins.
        assert_eq!(trip.suspect_reason, Some(SuspectReason::TooShort));
    }

    #[test]
    fn fast_trip_is_suspect() {
        let mut row = raw_row();
        row.trip_duration = "61".to_string();
        let config = CleaningConfig::default().with_max_speed_kmh(50.0);
        let trip = clean_row(row, &config).unwrap();
        assert_eq!(trip.suspect_reason, Some(SuspectReason::ImplausibleSpeed));
    }

    #[test]
    fn zero_passengers_and_unknown_vendor_are_suspect() {
        let mut row = raw_row();
        row.passenger_count = "0".to_string();
        let trip = clean_row(row, &CleaningConfig::default()).unwrap();
        assert_eq!(trip.suspect_reason, Some(SuspectReason::NoPassengers));

        let mut row = raw_row();
        row.vendor_id = "7".to_string();
        let trip = clean_row(row, &CleaningConfig::default()).unwrap();
        assert_eq!(trip.suspect_reason, Some(SuspectReason::UnknownVendor));
    }

    #[test]
    fn report_partitions_outcomes() {
        let mut bad = raw_row();
        bad.id.clear();
        let report: CleaningReport = vec![raw_row(), bad]
            .into_iter()
            .map(|row| clean_row(row, &CleaningConfig::default()))
            .collect();
        assert_eq!(report.trips.len(), 1);
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.total_rows(), 2);
        assert_eq!(report.suspect_count(), 0);
    }
}
