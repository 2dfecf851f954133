//! Spatial helpers: great-circle distance and H3 pickup zones.
//!
//! - **haversine_km**: distance between two lat/lng points on a 6371 km sphere
//! - **GeoIndex**: H3 resolution used to bucket pickups into zones
//! - **GeoBounds**: rectangular service area used by plausibility checks
//!
//! Default resolution is 9 (~240m cell size), fine enough for street-level
//! hot spots in a city the size of New York.

use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lon1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lon2) = (lat2.to_radians(), lng2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy)]
pub struct GeoIndex {
    resolution: Resolution,
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new(Resolution::Nine)
    }
}

impl GeoIndex {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    /// H3 cell containing the point, or `None` for coordinates H3 rejects.
    pub fn cell_for(&self, lat: f64, lng: f64) -> Option<CellIndex> {
        LatLng::new(lat, lng)
            .ok()
            .map(|point| point.to_cell(self.resolution))
    }
}

/// Rectangular lat/lng bounding box (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl GeoBounds {
    /// New York City service area.
    pub const NYC: GeoBounds = GeoBounds {
        lat_min: 40.5,
        lat_max: 41.0,
        lng_min: -74.3,
        lng_max: -73.7,
    };

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lng_min..=self.lng_max).contains(&lng)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::NYC
    }
}
