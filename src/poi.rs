//! Coordinates and the default POI model.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::traits::PointOfInterest;

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Rejects non-finite values and values outside the lat/lng ranges.
    pub fn validate(&self) -> Result<Self, GeoError> {
        let valid = self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng);

        if valid {
            Ok(*self)
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// A point of interest as supplied by the trip-management layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub coordinates: Coordinate,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub suggested_duration: Option<u32>,
    #[serde(default)]
    pub custom_duration: Option<u32>,
}

impl Poi {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            coordinates: Coordinate::new(lat, lng),
            category: String::new(),
            suggested_duration: None,
            custom_duration: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.suggested_duration = Some(minutes);
        self
    }

    pub fn custom_duration(mut self, minutes: u32) -> Self {
        self.custom_duration = Some(minutes);
        self
    }
}

impl PointOfInterest for Poi {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Coordinate {
        self.coordinates
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn suggested_duration_minutes(&self) -> Option<u32> {
        self.suggested_duration
    }

    fn custom_duration_minutes(&self) -> Option<u32> {
        self.custom_duration
    }
}
