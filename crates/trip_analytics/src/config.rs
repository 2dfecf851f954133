//! Cleaning thresholds applied while ingesting raw trips.

use h3o::Resolution;
use trip_core::spatial::GeoBounds;

use crate::error::{AnalyticsError, Result};

/// Default minimum plausible trip duration: one minute.
const DEFAULT_MIN_DURATION_SECS: u32 = 60;

/// Default maximum plausible average speed for city traffic.
const DEFAULT_MAX_SPEED_KMH: f64 = 120.0;

/// Default H3 resolution for pickup zones (~240m cells).
const DEFAULT_ZONE_RESOLUTION: Resolution = Resolution::Nine;

#[derive(Debug, Clone)]
pub struct CleaningConfig {
    /// Pickups and dropoffs outside this box are flagged as suspect.
    pub service_area: GeoBounds,
    /// Trips shorter than this (seconds) are flagged as suspect.
    pub min_duration_secs: u32,
    /// Trips faster than this (km/h) are flagged as suspect.
    pub max_speed_kmh: f64,
    /// H3 resolution for `pickup_zone`.
    pub zone_resolution: Resolution,
    /// Show a spinner on stderr while reading rows.
    pub show_progress: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            service_area: GeoBounds::NYC,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
            zone_resolution: DEFAULT_ZONE_RESOLUTION,
            show_progress: false,
        }
    }
}

impl CleaningConfig {
    pub fn with_service_area(mut self, bounds: GeoBounds) -> Self {
        self.service_area = bounds;
        self
    }

    pub fn with_min_duration_secs(mut self, secs: u32) -> Self {
        self.min_duration_secs = secs;
        self
    }

    pub fn with_max_speed_kmh(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh;
        self
    }

    pub fn with_zone_resolution(mut self, resolution: Resolution) -> Self {
        self.zone_resolution = resolution;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Parse a raw H3 resolution level (0–15).
pub fn parse_zone_resolution(level: u8) -> Result<Resolution> {
    Resolution::try_from(level).map_err(|_| {
        AnalyticsError::InvalidConfig(format!("zone resolution {level} is outside 0-15"))
    })
}
