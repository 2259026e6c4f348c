//! Tour construction: order scanned coordinates into a path.
//!
//! Uses a nearest-neighbor greedy heuristic. Starting from the first
//! coordinate in scan order, the tour repeatedly extends to the closest
//! coordinate not yet visited. Runs in O(n²), which is fine for the
//! tens to low hundreds of points a painted feature produces. The
//! result is not guaranteed to be a shortest path.
//!
//! Ties are broken by scan order: among equidistant candidates the one
//! scanned first wins.

use crate::types::{Coordinate, Tour};

/// Order `coordinates` by greedy nearest-neighbor chaining.
///
/// The output is a permutation of the input: every coordinate appears
/// exactly once. An empty input yields an empty tour.
#[must_use = "returns the ordered tour"]
pub fn build_tour(coordinates: &[Coordinate]) -> Tour {
    let Some(&seed) = coordinates.first() else {
        return Tour::default();
    };

    let n = coordinates.len();
    let mut visited = vec![false; n];
    let mut ordered = Vec::with_capacity(n);

    visited[0] = true;
    ordered.push(seed);
    let mut current = seed;

    for _ in 1..n {
        let mut best: Option<usize> = None;
        let mut best_dist = u64::MAX;

        for (j, &candidate) in coordinates.iter().enumerate() {
            if visited[j] {
                continue;
            }

            // Strict comparison keeps the earliest-scanned candidate on ties.
            let dist = current.distance_squared(candidate);
            if best.is_none() || dist < best_dist {
                best_dist = dist;
                best = Some(j);
            }
        }

        // At least one unvisited candidate remains on every iteration.
        let Some(best_idx) = best else {
            break;
        };

        visited[best_idx] = true;
        current = coordinates[best_idx];
        ordered.push(current);
    }

    Tour::new(ordered)
}

/// Total length of the path through `tour`, summing consecutive gaps.
#[must_use]
pub fn tour_length(tour: &Tour) -> f64 {
    tour.coordinates()
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum()
}
