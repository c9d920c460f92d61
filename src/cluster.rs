//! Partition POIs into day groups by spatial proximity.
//!
//! Latitude/longitude are treated as a flat 2-D feature space. Clustering is
//! seeded k-means++ followed by Lloyd iterations, restarted a fixed number of
//! times from one seeded RNG; the lowest-inertia run wins. The same input and
//! options always produce the same groups.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OptimizationError;
use crate::traits::PointOfInterest;

/// Longest trip, in days, that can be planned in one call.
pub const MAX_DAYS: usize = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    /// RNG seed for centroid initialization.
    pub seed: u64,
    /// Number of independent k-means runs.
    pub restarts: usize,
    /// Maximum Lloyd iterations per run.
    pub max_iterations: usize,
    /// Stop once total centroid movement (degrees) falls below this.
    pub tolerance: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// POIs assigned to one day of the trip.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<P> {
    /// 1-based day index.
    pub day: usize,
    pub pois: Vec<P>,
}

/// Split `pois` into `num_days` groups, at most [`MAX_DAYS`].
///
/// With no more POIs than days, POIs are dealt one per day in input order and
/// the remaining days stay empty. Otherwise groups come from k-means and any
/// empty group is refilled from the largest multi-member group.
pub fn cluster_into_days<P>(
    pois: &[P],
    num_days: usize,
    options: &ClusterOptions,
) -> Result<Vec<DayGroup<P>>, OptimizationError>
where
    P: PointOfInterest + Clone,
{
    if num_days == 0 {
        return Err(OptimizationError::InvalidArgument(
            "number of days must be positive".to_string(),
        ));
    }
    if num_days > MAX_DAYS {
        return Err(OptimizationError::InvalidArgument(format!(
            "number of days must be at most {}, got {}",
            MAX_DAYS, num_days
        )));
    }

    let groups: Vec<Vec<P>> = if pois.len() <= num_days {
        let mut groups: Vec<Vec<P>> = pois.iter().map(|poi| vec![poi.clone()]).collect();
        groups.resize_with(num_days, Vec::new);
        groups
    } else {
        let points: Vec<[f64; 2]> = pois
            .iter()
            .map(|poi| {
                let location = poi.location();
                [location.lat, location.lng]
            })
            .collect();

        let labels = kmeans(&points, num_days, options);

        let mut groups: Vec<Vec<P>> = vec![Vec::new(); num_days];
        for (poi, label) in pois.iter().zip(labels) {
            groups[label].push(poi.clone());
        }

        rebalance(&mut groups);
        groups
    };

    debug!(
        sizes = ?groups.iter().map(Vec::len).collect::<Vec<_>>(),
        "clustered POIs into day groups"
    );

    Ok(groups
        .into_iter()
        .enumerate()
        .map(|(index, pois)| DayGroup {
            day: index + 1,
            pois,
        })
        .collect())
}

/// Move the tail member of the largest group into each empty group.
///
/// Only groups with more than one member donate; ties go to the lowest index.
pub fn rebalance<T>(groups: &mut [Vec<T>]) {
    for empty in 0..groups.len() {
        if !groups[empty].is_empty() {
            continue;
        }

        let donor = groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.len() > 1)
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then_with(|| b.0.cmp(&a.0)))
            .map(|(index, _)| index);

        let Some(donor) = donor else {
            warn!(day = empty + 1, "no donor group left, day stays empty");
            break;
        };

        if let Some(moved) = groups[donor].pop() {
            groups[empty].push(moved);
        }
    }
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn nearest_center(point: &[f64; 2], centers: &[[f64; 2]]) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (j, center) in centers.iter().enumerate() {
        let dist = squared_distance(point, center);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = j;
        }
    }
    best_cluster
}

/// Cluster labels in `0..k` for each point.
fn kmeans(points: &[[f64; 2]], k: usize, options: &ClusterOptions) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut best: Option<(f64, Vec<usize>)> = None;

    for _ in 0..options.restarts.max(1) {
        let centers = seed_centers(points, k, &mut rng);
        let (labels, inertia) = lloyd(points, centers, options);

        let improved = best
            .as_ref()
            .map_or(true, |(best_inertia, _)| inertia < *best_inertia);
        if improved {
            best = Some((inertia, labels));
        }
    }

    best.map(|(_, labels)| labels)
        .unwrap_or_else(|| vec![0; points.len()])
}

/// k-means++ initialization.
fn seed_centers(points: &[[f64; 2]], k: usize, rng: &mut StdRng) -> Vec<[f64; 2]> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[rng.gen_range(0..points.len())]);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|point| squared_distance(point, &centers[0]))
        .collect();

    while centers.len() < k {
        let total: f64 = nearest.iter().sum();

        let chosen = if total > 0.0 {
            let mut target = rng.r#gen::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (i, weight) in nearest.iter().enumerate() {
                if target < *weight {
                    chosen = i;
                    break;
                }
                target -= weight;
            }
            chosen
        } else {
            // All points coincide with existing centers.
            rng.gen_range(0..points.len())
        };

        let center = points[chosen];
        centers.push(center);
        for (weight, point) in nearest.iter_mut().zip(points) {
            *weight = weight.min(squared_distance(point, &center));
        }
    }

    centers
}

/// Lloyd iterations. Returns labels and inertia against the final centers.
fn lloyd(
    points: &[[f64; 2]],
    mut centers: Vec<[f64; 2]>,
    options: &ClusterOptions,
) -> (Vec<usize>, f64) {
    let k = centers.len();
    let mut labels = vec![0usize; points.len()];
    let tolerance_sq = options.tolerance * options.tolerance;

    for _ in 0..options.max_iterations.max(1) {
        for (label, point) in labels.iter_mut().zip(points) {
            *label = nearest_center(point, &centers);
        }

        let mut sums = vec![[0.0f64; 2]; k];
        let mut counts = vec![0usize; k];
        for (label, point) in labels.iter().zip(points) {
            sums[*label][0] += point[0];
            sums[*label][1] += point[1];
            counts[*label] += 1;
        }

        let mut shift = 0.0;
        for j in 0..k {
            // Empty clusters keep their previous center.
            if counts[j] == 0 {
                continue;
            }
            let updated = [sums[j][0] / counts[j] as f64, sums[j][1] / counts[j] as f64];
            shift += squared_distance(&updated, &centers[j]);
            centers[j] = updated;
        }

        if shift <= tolerance_sq {
            break;
        }
    }

    for (label, point) in labels.iter_mut().zip(points) {
        *label = nearest_center(point, &centers);
    }

    let inertia = labels
        .iter()
        .zip(points)
        .map(|(label, point)| squared_distance(point, &centers[*label]))
        .sum();

    (labels, inertia)
}
