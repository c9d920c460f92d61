//! trip-planner core
//!
//! Assigns points of interest to trip days and orders each day's visits,
//! producing an itinerary annotated with travel and stay estimates.

pub mod traits;
pub mod error;
pub mod poi;
pub mod haversine;
pub mod cluster;
pub mod sequence;
pub mod travel;
pub mod stay;
pub mod polyline;
pub mod planner;

pub use error::OptimizationError;
pub use planner::{PlannerOptions, TripPlan, TripPlanner, TripRequest, optimize};
pub use poi::{Coordinate, Poi};
