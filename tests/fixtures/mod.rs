//! Test fixtures for trip-planner.
//!
//! Provides realistic test data:
//! - Popular sights in Beijing, Shanghai and Xi'an with real coordinates
//! - Helpers turning them into `Poi` values

pub mod china_hotspots;

pub use china_hotspots::*;
