//! Visit ordering within a day group.
//!
//! Groups up to the exact threshold are solved by enumerating every
//! permutation of the members after the first. Larger groups use greedy
//! nearest-neighbour, optionally polished with 2-opt.

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::error::GeoError;
use crate::poi::Coordinate;
use crate::traits::{DistanceProvider, PointOfInterest};

/// Largest group solved exhaustively. The exact search visits (n-1)! paths,
/// 5040 at this size.
pub const DEFAULT_EXACT_THRESHOLD: usize = 8;

const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// How a group's order was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStrategy {
    /// Zero to two members, returned in input order.
    Unchanged,
    Exact,
    NearestNeighbor,
    NearestNeighborTwoOpt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOptions {
    pub exact_threshold: usize,
    /// Post-process nearest-neighbour orders with 2-opt.
    pub two_opt: bool,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            two_opt: false,
        }
    }
}

/// Order `pois` to approximately minimize total traversed distance.
///
/// The first POI always stays first.
pub fn sequence_pois<P, D>(
    pois: Vec<P>,
    distances: &D,
    options: SequenceOptions,
) -> Result<(Vec<P>, SequenceStrategy), GeoError>
where
    P: PointOfInterest,
    D: DistanceProvider + ?Sized,
{
    let n = pois.len();
    if n <= 2 {
        return Ok((pois, SequenceStrategy::Unchanged));
    }

    let locations: Vec<Coordinate> = pois.iter().map(|poi| poi.location()).collect();
    let matrix = distances.matrix_for(&locations)?;

    let (order, strategy) = if n <= options.exact_threshold {
        (exact_order(&matrix), SequenceStrategy::Exact)
    } else {
        let mut order = nearest_neighbor_order(&matrix);
        if options.two_opt {
            two_opt_improve(&mut order, &matrix);
            (order, SequenceStrategy::NearestNeighborTwoOpt)
        } else {
            (order, SequenceStrategy::NearestNeighbor)
        }
    };

    debug!(
        size = n,
        ?strategy,
        distance_km = path_distance_km(&order, &matrix),
        "sequenced day group"
    );

    Ok((reorder(pois, &order), strategy))
}

/// Total distance in km of visiting `pois` in the given order.
pub fn route_distance_km<P, D>(pois: &[P], distances: &D) -> Result<f64, GeoError>
where
    P: PointOfInterest,
    D: DistanceProvider + ?Sized,
{
    pois.windows(2).try_fold(0.0, |total, pair| {
        Ok(total + distances.distance_km(pair[0].location(), pair[1].location())?)
    })
}

fn path_distance_km(order: &[usize], matrix: &[Vec<f64>]) -> f64 {
    order
        .windows(2)
        .map(|pair| matrix[pair[0]][pair[1]])
        .sum()
}

/// Exhaustive search with the first index fixed. Permutations are enumerated
/// in lexicographic order of input positions; the first minimum wins.
fn exact_order(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    let mut best_order: Vec<usize> = (0..n).collect();
    let mut best_distance = f64::INFINITY;

    for permutation in (1..n).permutations(n - 1) {
        let mut distance = 0.0;
        let mut previous = 0;
        for &next in &permutation {
            distance += matrix[previous][next];
            previous = next;
        }

        if distance < best_distance {
            best_distance = distance;
            best_order.truncate(1);
            best_order.extend(permutation);
        }
    }

    best_order
}

/// Greedy nearest neighbour from index 0. Ties go to the earliest remaining.
fn nearest_neighbor_order(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    let mut order = Vec::with_capacity(n);
    order.push(0);
    let mut remaining: Vec<usize> = (1..n).collect();

    while !remaining.is_empty() {
        let current = order[order.len() - 1];
        let mut nearest_pos = 0;
        let mut nearest_distance = f64::INFINITY;

        for (pos, &candidate) in remaining.iter().enumerate() {
            let distance = matrix[current][candidate];
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest_pos = pos;
            }
        }

        order.push(remaining.remove(nearest_pos));
    }

    order
}

/// 2-opt: reverse segments after the fixed start while that shortens the path.
fn two_opt_improve(order: &mut [usize], matrix: &[Vec<f64>]) {
    let n = order.len();
    if n < 3 {
        return;
    }

    let mut current = path_distance_km(order, matrix);
    let mut improved = true;

    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in i + 2..n {
                order[i + 1..=j].reverse();
                let candidate = path_distance_km(order, matrix);
                if candidate + IMPROVEMENT_EPSILON < current {
                    current = candidate;
                    improved = true;
                } else {
                    order[i + 1..=j].reverse();
                }
            }
        }
    }
}

fn reorder<P>(pois: Vec<P>, order: &[usize]) -> Vec<P> {
    let mut slots: Vec<Option<P>> = pois.into_iter().map(Some).collect();
    order
        .iter()
        .filter_map(|&index| slots[index].take())
        .collect()
}
