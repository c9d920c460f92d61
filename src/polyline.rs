//! Polyline representation for route geometries.
//!
//! Edges carry a straight-line approximation of the hop. Encoding to a
//! compact wire format happens at the caller's boundary, not here.

use serde::{Deserialize, Serialize};

use crate::poi::Coordinate;

/// One intermediate waypoint per this many kilometers.
const WAYPOINT_SPACING_KM: f64 = 2.0;
const MAX_INTERMEDIATE_WAYPOINTS: usize = 5;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Evenly spaced points from `from` to `to`, endpoints included.
    ///
    /// Adds one intermediate point per 2 km of `distance_km`, at most five.
    pub fn straight_line(from: Coordinate, to: Coordinate, distance_km: f64) -> Self {
        let intermediate = ((distance_km / WAYPOINT_SPACING_KM).floor().max(0.0) as usize)
            .min(MAX_INTERMEDIATE_WAYPOINTS);

        let mut points = Vec::with_capacity(intermediate + 2);
        points.push(from);
        for i in 1..=intermediate {
            let ratio = i as f64 / (intermediate + 1) as f64;
            points.push(Coordinate::new(
                from.lat + (to.lat - from.lat) * ratio,
                from.lng + (to.lng - from.lng) * ratio,
            ));
        }
        points.push(to);

        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_points() {
        let points = vec![Coordinate::new(38.5, -120.2), Coordinate::new(40.7, -120.95)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn test_short_hop_has_only_endpoints() {
        let from = Coordinate::new(39.90, 116.39);
        let to = Coordinate::new(39.91, 116.40);
        let polyline = Polyline::straight_line(from, to, 1.4);
        assert_eq!(polyline.points(), &[from, to]);
    }

    #[test]
    fn test_intermediate_points_are_evenly_spaced() {
        let from = Coordinate::new(0.0, 0.0);
        let to = Coordinate::new(0.0, 0.04);
        let polyline = Polyline::straight_line(from, to, 4.4);
        let lngs: Vec<f64> = polyline.points().iter().map(|p| p.lng).collect();
        assert_eq!(lngs.len(), 4);
        assert!((lngs[1] - 0.04 / 3.0).abs() < 1e-12);
        assert!((lngs[2] - 0.08 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_waypoints_capped() {
        let polyline = Polyline::straight_line(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0), 157.0);
        assert_eq!(polyline.points().len(), MAX_INTERMEDIATE_WAYPOINTS + 2);
    }

    #[test]
    fn test_serializes_as_point_list() {
        let polyline = Polyline::new(vec![Coordinate::new(1.5, 2.5)]);
        let json = serde_json::to_string(&polyline).unwrap();
        assert_eq!(json, r#"[{"lat":1.5,"lng":2.5}]"#);
    }
}
