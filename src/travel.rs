//! Travel time and cost estimates per route edge.
//!
//! Durations come from a per-mode base speed, a time-of-day congestion
//! factor (driving only), fixed transit waiting, and per-km friction for
//! road modes.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::OptimizationError;

/// Congestion factor applied to driving speed on weekday rush hours.
const PEAK_FACTOR: f64 = 0.6;
const WEEKDAY_MIDDAY_FACTOR: f64 = 0.8;
const WEEKEND_MIDDAY_FACTOR: f64 = 0.9;

const TRANSIT_WAIT_WEEKDAY_MIN: f64 = 8.0;
const TRANSIT_WAIT_WEEKEND_MIN: f64 = 12.0;

/// Intersections and stops, minutes per km.
const FRICTION_MIN_PER_KM: f64 = 1.5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Cycling,
    Transit,
    /// Unrecognized label. Travels at driving speed with no adjustments.
    Other(String),
}

impl TransportMode {
    /// Permissive parse: unknown labels become [`TransportMode::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "driving" => TransportMode::Driving,
            "walking" => TransportMode::Walking,
            "cycling" => TransportMode::Cycling,
            "transit" => TransportMode::Transit,
            _ => TransportMode::Other(label.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TransportMode::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Transit => "transit",
            TransportMode::Other(label) => label,
        }
    }

    /// Average speed in km/h before congestion.
    pub fn base_speed_kmh(&self) -> f64 {
        match self {
            TransportMode::Driving | TransportMode::Other(_) => 40.0,
            TransportMode::Walking => 5.0,
            TransportMode::Cycling => 15.0,
            TransportMode::Transit => 25.0,
        }
    }

    fn base_cost(&self) -> f64 {
        match self {
            TransportMode::Driving => 10.0,
            TransportMode::Transit => 3.0,
            _ => 0.0,
        }
    }

    fn cost_per_km(&self) -> f64 {
        match self {
            TransportMode::Driving => 2.0,
            TransportMode::Transit => 0.5,
            _ => 0.0,
        }
    }

    fn waiting_minutes(&self, is_weekend: bool) -> f64 {
        match (self, is_weekend) {
            (TransportMode::Transit, false) => TRANSIT_WAIT_WEEKDAY_MIN,
            (TransportMode::Transit, true) => TRANSIT_WAIT_WEEKEND_MIN,
            _ => 0.0,
        }
    }

    fn friction_minutes_per_km(&self) -> f64 {
        match self {
            TransportMode::Driving | TransportMode::Cycling => FRICTION_MIN_PER_KM,
            _ => 0.0,
        }
    }

    /// Verb used in route instructions.
    pub fn verb(&self) -> &str {
        match self {
            TransportMode::Driving => "Drive",
            TransportMode::Walking => "Walk",
            TransportMode::Cycling => "Cycle",
            TransportMode::Transit => "Take transit",
            TransportMode::Other(_) => "Travel",
        }
    }
}

/// Strict parse: unknown labels are rejected.
impl FromStr for TransportMode {
    type Err = OptimizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TransportMode::from_label(s) {
            TransportMode::Other(label) => Err(OptimizationError::InvalidArgument(format!(
                "unsupported transport mode '{}'",
                label
            ))),
            mode => Ok(mode),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransportMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Driving speed factor for the given hour (0-23) and day type.
pub fn congestion_multiplier(hour: u32, is_weekend: bool) -> f64 {
    let hour = hour % 24;
    if is_weekend {
        match hour {
            10..=18 => WEEKEND_MIDDAY_FACTOR,
            _ => 1.0,
        }
    } else {
        match hour {
            7..=9 | 17..=19 => PEAK_FACTOR,
            10..=16 => WEEKDAY_MIDDAY_FACTOR,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelEstimate {
    /// Whole minutes, at least 1.
    pub duration_minutes: u32,
    /// Whole currency units.
    pub cost: u32,
}

/// Estimate one hop of `distance_km` departing at `hour`.
pub fn estimate(distance_km: f64, mode: &TransportMode, hour: u32, is_weekend: bool) -> TravelEstimate {
    let distance_km = distance_km.max(0.0);

    let speed = match mode {
        TransportMode::Driving => mode.base_speed_kmh() * congestion_multiplier(hour, is_weekend),
        _ => mode.base_speed_kmh(),
    };

    let moving = distance_km / speed * 60.0;
    let waiting = mode.waiting_minutes(is_weekend);
    let friction = distance_km * mode.friction_minutes_per_km();

    let duration_minutes = ((moving + waiting + friction).round() as u32).max(1);
    let cost = (mode.base_cost() + distance_km * mode.cost_per_km()).round() as u32;

    TravelEstimate {
        duration_minutes,
        cost,
    }
}
