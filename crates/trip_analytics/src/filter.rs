//! Trip listing and dashboard filters.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use trip_core::trip::TripRecord;

use crate::error::{AnalyticsError, Result};

pub const DEFAULT_LIMIT: usize = 100;

/// Passenger-count constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerFilter {
    Exactly(u32),
    AtLeast(u32),
}

impl PassengerFilter {
    /// Parses the dashboard form values: `"2"` means exactly two, `"3+"` (or a
    /// bare `"3"`, the dashboard's top bucket) means three or more.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (digits, open_ended) = match raw.strip_suffix('+') {
            Some(digits) => (digits, true),
            None => (raw, raw == "3"),
        };
        let count = digits
            .parse::<u32>()
            .map_err(|_| AnalyticsError::InvalidFilter(format!("bad passenger count '{raw}'")))?;
        Ok(if open_ended {
            Self::AtLeast(count)
        } else {
            Self::Exactly(count)
        })
    }

    pub fn matches(&self, passengers: u32) -> bool {
        match *self {
            Self::Exactly(n) => passengers == n,
            Self::AtLeast(n) => passengers >= n,
        }
    }
}

/// Inclusive range of pickup calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_filter_date(start)?;
        let end = parse_filter_date(end)?;
        if end < start {
            return Err(AnalyticsError::InvalidFilter(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, trip: &TripRecord) -> bool {
        let pickup = trip.pickup_datetime;
        let start = self.start.and_hms_opt(0, 0, 0);
        let end = self
            .end
            .checked_add_days(Days::new(1))
            .and_then(|day| day.and_hms_opt(0, 0, 0));
        match (start, end) {
            (Some(start), Some(end)) => pickup >= start && pickup < end,
            (Some(start), None) => pickup >= start,
            _ => false,
        }
    }
}

/// Parse `MM/DD/YYYY` or `YYYY-MM-DD`.
pub fn parse_filter_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let format = if raw.contains('/') { "%m/%d/%Y" } else { "%Y-%m-%d" };
    NaiveDate::parse_from_str(raw, format)
        .map_err(|_| AnalyticsError::InvalidFilter(format!("bad date '{raw}'")))
}

/// Constraints for trip listings. Unset fields match everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripFilter {
    pub vendor_id: Option<u8>,
    pub day_of_week: Option<u8>,
    pub hour_of_day: Option<u8>,
    pub min_distance: Option<f64>,
    pub max_distance: Option<f64>,
    pub passengers: Option<PassengerFilter>,
    pub dates: Option<DateRange>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for TripFilter {
    fn default() -> Self {
        Self {
            vendor_id: None,
            day_of_week: None,
            hour_of_day: None,
            min_distance: None,
            max_distance: None,
            passengers: None,
            dates: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl TripFilter {
    pub fn with_vendor(mut self, vendor_id: u8) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn with_day_of_week(mut self, day: u8) -> Self {
        self.day_of_week = Some(day);
        self
    }

    pub fn with_hour_of_day(mut self, hour: u8) -> Self {
        self.hour_of_day = Some(hour);
        self
    }

    pub fn with_distance_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_passengers(mut self, passengers: PassengerFilter) -> Self {
        self.passengers = Some(passengers);
        self
    }

    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = Some(dates);
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Whether `trip` satisfies every set constraint. Paging is not applied here.
    pub fn matches(&self, trip: &TripRecord) -> bool {
        self.vendor_id.map_or(true, |v| trip.vendor_id == v)
            && self.day_of_week.map_or(true, |d| trip.day_of_week == d)
            && self.hour_of_day.map_or(true, |h| trip.hour_of_day == h)
            && self.min_distance.map_or(true, |min| trip.trip_distance >= min)
            && self.max_distance.map_or(true, |max| trip.trip_distance <= max)
            && self
                .passengers
                .map_or(true, |p| p.matches(trip.passenger_count))
            && self.dates.map_or(true, |range| range.contains(trip))
    }
}
