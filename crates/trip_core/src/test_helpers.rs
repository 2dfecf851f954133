//! Test helpers for building trip records without going through CSV cleaning.

use chrono::NaiveDateTime;

use crate::trip::{StoreAndForward, TripRecord};

/// Pickup timestamp shared by helper trips: Monday 2016-03-14 17:24:55.
pub const TEST_PICKUP: &str = "2016-03-14 17:24:55";

pub fn test_pickup() -> NaiveDateTime {
    NaiveDateTime::parse_from_str(TEST_PICKUP, "%Y-%m-%d %H:%M:%S")
        .expect("TEST_PICKUP should be a valid timestamp")
}

/// A plausible midtown Manhattan trip with the given average speed.
///
/// Distance is fixed at 2 km; duration is derived from the speed where possible.
pub fn sample_trip(id: &str, average_speed: f64) -> TripRecord {
    let pickup = test_pickup();
    let trip_duration = if average_speed.is_finite() && average_speed > 0.0 {
        (2.0 / average_speed * 3600.0).round() as u32
    } else {
        600
    };
    TripRecord {
        id: id.to_string(),
        vendor_id: 1,
        pickup_datetime: pickup,
        dropoff_datetime: pickup + chrono::Duration::seconds(i64::from(trip_duration)),
        passenger_count: 1,
        pickup_longitude: -73.982155,
        pickup_latitude: 40.767937,
        dropoff_longitude: -73.964630,
        dropoff_latitude: 40.765602,
        store_and_fwd_flag: StoreAndForward::No,
        trip_duration,
        trip_distance: 2.0,
        average_speed,
        hour_of_day: 17,
        day_of_week: 1,
        pickup_zone: None,
        is_suspect: false,
        suspect_reason: None,
    }
}

/// One helper trip per speed, with ids `t0`, `t1`, ...
pub fn trips_with_speeds(speeds: &[f64]) -> Vec<TripRecord> {
    speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| sample_trip(&format!("t{i}"), speed))
        .collect()
}
