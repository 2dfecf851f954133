//! In-memory trip store.
//!
//! Trips are kept in insertion order with an id index on the side. Reads hand
//! out shared references; rankings work on private copies so any number of
//! them can run at once against the same store.

use std::collections::HashMap;

use rayon::prelude::*;
use trip_core::ranking::{rank_trips, TopTripsQuery};
use trip_core::selection::SelectorConfig;
use trip_core::trip::TripRecord;

use crate::error::{AnalyticsError, Result};
use crate::filter::TripFilter;
use crate::stats::{dashboard_stats, summarize, DashboardStats, TripSummary};

#[derive(Debug, Default)]
pub struct TripStore {
    trips: Vec<TripRecord>,
    by_id: HashMap<String, usize>,
    selector: SelectorConfig,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose rankings use the given selector settings.
    pub fn with_selector(selector: SelectorConfig) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    pub fn from_trips(trips: impl IntoIterator<Item = TripRecord>) -> Self {
        let mut store = Self::new();
        store.insert_batch(trips);
        store
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    /// Insert trips, skipping ids that are already stored. Returns how many were added.
    pub fn insert_batch(&mut self, trips: impl IntoIterator<Item = TripRecord>) -> usize {
        let before = self.trips.len();
        let mut skipped = 0usize;
        for trip in trips {
            if self.by_id.contains_key(&trip.id) {
                skipped += 1;
                continue;
            }
            self.by_id.insert(trip.id.clone(), self.trips.len());
            self.trips.push(trip);
        }
        let inserted = self.trips.len() - before;
        tracing::debug!(inserted, skipped, total = self.trips.len(), "inserted trip batch");
        inserted
    }

    pub fn get(&self, id: &str) -> Option<&TripRecord> {
        self.by_id.get(id).map(|&index| &self.trips[index])
    }

    pub fn require(&self, id: &str) -> Result<&TripRecord> {
        self.get(id)
            .ok_or_else(|| AnalyticsError::NotFound(id.to_string()))
    }

    /// Trips matching `filter`, paged by its offset and limit.
    pub fn query(&self, filter: &TripFilter) -> Vec<&TripRecord> {
        self.trips
            .iter()
            .filter(|trip| filter.matches(trip))
            .skip(filter.offset)
            .take(filter.limit)
            .collect()
    }

    pub fn anomalies(&self) -> Vec<&TripRecord> {
        self.trips.iter().filter(|trip| trip.is_suspect).collect()
    }

    pub fn summary(&self) -> TripSummary {
        summarize(&self.trips)
    }

    /// Dashboard statistics over every trip matching `filter` (paging ignored).
    pub fn dashboard(&self, filter: &TripFilter) -> DashboardStats {
        dashboard_stats(self.trips.iter().filter(|trip| filter.matches(trip)))
    }

    /// Top trips for one query, selected from a private copy of the store.
    pub fn top_trips(&self, query: &TopTripsQuery) -> Vec<TripRecord> {
        tracing::debug!(metric = %query.metric, k = query.k, "ranking trips");
        rank_trips(&self.trips, query, self.selector)
    }

    /// Run several rankings in parallel, each over its own copy of the store.
    pub fn top_trips_many(&self, queries: &[TopTripsQuery]) -> Vec<Vec<TripRecord>> {
        queries
            .par_iter()
            .map(|query| rank_trips(&self.trips, query, self.selector))
            .collect()
    }
}
