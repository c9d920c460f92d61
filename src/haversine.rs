//! Great-circle distance between coordinates.
//!
//! `HaversineDistance` computes every query from scratch; `DistanceCache`
//! memoizes results for the lifetime of one planner instance.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::GeoError;
use crate::poi::Coordinate;
use crate::traits::DistanceProvider;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Uncached haversine provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> Result<f64, GeoError> {
        Ok(haversine_km(from.validate()?, to.validate()?))
    }
}

type PairKey = (u64, u64, u64, u64);

fn pair_key(from: Coordinate, to: Coordinate) -> PairKey {
    (
        from.lat.to_bits(),
        from.lng.to_bits(),
        to.lat.to_bits(),
        to.lng.to_bits(),
    )
}

/// Symmetric memo of haversine distances.
///
/// Each result is stored under both orderings of the pair. The map is
/// unbounded; it lives as long as its owner.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: Mutex<HashMap<PairKey, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries (two per distinct unordered pair).
    pub fn len(&self) -> Result<usize, GeoError> {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .map_err(|_| GeoError::CachePoisoned)
    }

    pub fn is_empty(&self) -> Result<bool, GeoError> {
        Ok(self.len()? == 0)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) -> Result<(), GeoError> {
        let mut entries = self.entries.lock().map_err(|_| GeoError::CachePoisoned)?;
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        Ok(())
    }
}

impl DistanceProvider for DistanceCache {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> Result<f64, GeoError> {
        let from = from.validate()?;
        let to = to.validate()?;
        let key = pair_key(from, to);

        {
            let entries = self.entries.lock().map_err(|_| GeoError::CachePoisoned)?;
            if let Some(km) = entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(*km);
            }
        }

        let km = haversine_km(from, to);
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.lock().map_err(|_| GeoError::CachePoisoned)?;
        entries.insert(key, km);
        entries.insert(pair_key(to, from), km);

        Ok(km)
    }
}
