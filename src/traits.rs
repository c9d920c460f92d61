//! Core domain traits for the trip planner.
//!
//! Callers keep ownership of their POI model and expose it through
//! [`PointOfInterest`]; distance sources plug in through [`DistanceProvider`].

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GeoError;
use crate::poi::Coordinate;

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// A place the traveller wants to visit.
pub trait PointOfInterest {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Display name, used in route instructions.
    fn name(&self) -> &str {
        ""
    }

    fn location(&self) -> Coordinate;

    /// Free-form category label. Empty when unknown.
    fn category(&self) -> &str;

    /// Suggested dwell time in minutes.
    fn suggested_duration_minutes(&self) -> Option<u32>;

    /// User-chosen dwell time. Takes precedence over the suggestion.
    fn custom_duration_minutes(&self) -> Option<u32> {
        None
    }
}

/// Provides great-circle distances in kilometers.
pub trait DistanceProvider {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> Result<f64, GeoError>;

    /// Pairwise matrix indexed by the provided location order.
    fn matrix_for(&self, locations: &[Coordinate]) -> Result<Vec<Vec<f64>>, GeoError> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let km = self.distance_km(locations[i], locations[j])?;
                matrix[i][j] = km;
                matrix[j][i] = km;
            }
        }

        Ok(matrix)
    }
}

impl<D: DistanceProvider + ?Sized> DistanceProvider for &D {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> Result<f64, GeoError> {
        (**self).distance_km(from, to)
    }
}
