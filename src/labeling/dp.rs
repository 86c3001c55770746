//! Label-correcting engine for elementary shortest paths.
//!
//! # Algorithm
//!
//! Bellman-Ford-style label correction over the earliest visit interval of
//! each location. Every client carries one label (cost, predecessor,
//! visited set); labels are relaxed in synchronous passes that read the
//! previous pass's snapshot. An arc (i, j) relaxes j when the visit at i
//! releases early enough to catch j's interval, j is not already on i's
//! path, and the extended cost improves on j's label. The tour is closed
//! by adding the return arc to every label and taking the minimum.
//!
//! The depot departure time is unconstrained, so the opening arc to any
//! client is always time-feasible and every label starts from the direct
//! depot arc cost.
//!
//! # Complexity
//!
//! O(n²) per pass, at most n − 1 passes (an elementary path has at most
//! n − 1 arcs), with early exit on a fixed-point pass.
//!
//! # Reference
//!
//! Bellman, R. (1958). "On a routing problem", *Quarterly of Applied
//! Mathematics* 16, 87-90.
//!
//! Feillet, D., Dejax, P., Gendreau, M., Gueguen, C. (2004). "An exact
//! algorithm for the elementary shortest path problem with resource
//! constraints", *Networks* 44(3), 216-229.

use log::debug;

use crate::models::{Instance, Tour};

/// Finds a minimum-cost elementary depot-to-depot tour using the earliest
/// visit interval of each location.
///
/// Returns the empty tour when the instance has no clients. A tour with
/// positive cost is still returned when every tour costs more than staying
/// at the depot; callers decide whether such a tour is worth keeping.
///
/// # Examples
///
/// ```
/// use espptw::labeling;
/// use espptw::models::{Instance, VisitInterval};
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// instance.add_location(vec![iv], 3.0, 4.0, 0.0).unwrap();
///
/// let tour = labeling::solve(&instance);
/// assert_eq!(tour.locations(), &[1]);
/// assert_eq!(tour.cost(), 10.0);
/// ```
pub fn solve(instance: &Instance) -> Tour {
    let n = instance.len();
    if n <= 1 {
        return Tour::empty();
    }

    let mut best = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![vec![false; n]; n];
    for j in 1..n {
        best[j] = instance.cost(0, j);
    }

    let mut passes = 0;
    for _ in 1..n {
        let prev_best = best.clone();
        let prev_visited = visited.clone();
        let mut changed = false;
        passes += 1;

        for i in 1..n {
            let release = instance.location(i).earliest().end();
            for j in 1..n {
                if i == j || prev_visited[i][j] {
                    continue;
                }
                let arrival = release + instance.duration(i, j);
                if !instance.location(j).earliest().admits(arrival) {
                    continue;
                }
                let relaxed = prev_best[i] + instance.cost(i, j);
                if relaxed < best[j] {
                    best[j] = relaxed;
                    pred[j] = Some(i);
                    visited[j] = prev_visited[i].clone();
                    visited[j][i] = true;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut best_cost = f64::INFINITY;
    let mut best_end = 0;
    for j in 1..n {
        let closed = best[j] + instance.cost(j, 0);
        if closed < best_cost {
            best_cost = closed;
            best_end = j;
        }
    }
    debug!(
        "label relaxation fixed point after {} passes, best closing cost {}",
        passes, best_cost
    );

    let mut path = Vec::new();
    let mut current = Some(best_end);
    while let Some(j) = current {
        path.push(j);
        current = pred[j];
    }
    path.reverse();

    Tour::new(path, best_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitInterval;

    fn iv(start: i64, end: i64) -> VisitInterval {
        VisitInterval::new(start, end).expect("valid interval")
    }

    fn depot_at_origin() -> Instance {
        let mut instance = Instance::new();
        instance
            .add_location(vec![iv(0, 0)], 0.0, 0.0, 0.0)
            .expect("depot");
        instance
    }

    #[test]
    fn test_no_clients_yields_empty_tour() {
        let instance = depot_at_origin();
        let tour = solve(&instance);
        assert!(tour.is_empty());
        assert_eq!(tour.cost(), 0.0);
    }

    #[test]
    fn test_single_client_round_trip() {
        let mut instance = depot_at_origin();
        instance
            .add_location(vec![iv(0, 100)], 3.0, 4.0, 0.0)
            .expect("client");
        let tour = solve(&instance);
        assert_eq!(tour.locations(), &[1]);
        assert_eq!(tour.cost(), 10.0);
    }

    #[test]
    fn test_reward_makes_tour_profitable() {
        let mut instance = depot_at_origin();
        instance
            .add_location(vec![iv(0, 100)], 3.0, 4.0, 20.0)
            .expect("client");
        let tour = solve(&instance);
        assert_eq!(tour.locations(), &[1]);
        assert_eq!(tour.cost(), -10.0);
    }

    #[test]
    fn test_chain_forced_by_rewards() {
        let mut instance = depot_at_origin();
        instance
            .add_location(vec![iv(10, 20)], 1.0, 0.0, 5.0)
            .expect("client 1");
        instance
            .add_location(vec![iv(30, 100)], 2.0, 0.0, 5.0)
            .expect("client 2");
        // 0 -> 1: cost 1 - 5 = -4; 1 -> 2 leaves at 20, arrives 21 <= 30,
        // cost 1 - 5 = -4; close 2 -> 0 costs 2. Total -6.
        let tour = solve(&instance);
        assert_eq!(tour.locations(), &[1, 2]);
        assert_eq!(tour.cost(), -6.0);
    }

    #[test]
    fn test_time_windows_block_chaining() {
        let mut instance = depot_at_origin();
        instance
            .add_location(vec![iv(10, 20)], 1.0, 0.0, 5.0)
            .expect("client 1");
        // Interval starts before client 1 releases: no chain in either
        // direction, best tour visits the more rewarding client alone.
        instance
            .add_location(vec![iv(15, 100)], 2.0, 0.0, 9.0)
            .expect("client 2");
        let tour = solve(&instance);
        assert_eq!(tour.locations(), &[2]);
        assert_eq!(tour.cost(), 2.0 - 9.0 + 2.0);
    }

    #[test]
    fn test_elementariness_blocks_revisits() {
        // Two clients on top of the depot with degenerate intervals: every
        // arc costs -1, so only the visited sets stop an endless loop.
        let mut instance = depot_at_origin();
        instance
            .add_location(vec![iv(0, 0)], 0.0, 0.0, 1.0)
            .expect("client 1");
        instance
            .add_location(vec![iv(0, 0)], 0.0, 0.0, 1.0)
            .expect("client 2");
        let tour = solve(&instance);
        assert_eq!(tour.len(), 2);
        assert_ne!(tour.locations()[0], tour.locations()[1]);
        assert_eq!(tour.cost(), -2.0);
    }

    mod brute_force {
        use super::*;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        fn enumerate(
            instance: &Instance,
            path: &mut Vec<usize>,
            visited: &mut Vec<bool>,
            cost: f64,
            best: &mut f64,
        ) {
            let last = *path.last().expect("non-empty path");
            *best = best.min(cost + instance.cost(last, 0));
            let release = instance.location(last).earliest().end();
            for next in 1..instance.len() {
                if visited[next] {
                    continue;
                }
                let arrival = release + instance.duration(last, next);
                if !instance.location(next).earliest().admits(arrival) {
                    continue;
                }
                path.push(next);
                visited[next] = true;
                enumerate(instance, path, visited, cost + instance.cost(last, next), best);
                visited[next] = false;
                path.pop();
            }
        }

        fn brute_force_cost(instance: &Instance) -> f64 {
            let mut best = f64::INFINITY;
            for first in 1..instance.len() {
                let mut path = vec![first];
                let mut visited = vec![false; instance.len()];
                visited[first] = true;
                enumerate(
                    instance,
                    &mut path,
                    &mut visited,
                    instance.cost(0, first),
                    &mut best,
                );
            }
            best
        }

        // Distinct integer coordinates keep every pairwise duration at
        // least 1, so time-feasible arcs strictly increase interval
        // starts and the feasibility graph is acyclic.
        fn random_instance(rng: &mut StdRng, num_clients: usize) -> Instance {
            let mut instance = Instance::new();
            let mut taken = vec![(0i64, 0i64)];
            instance
                .add_location(vec![iv(0, 0)], 0.0, 0.0, 0.0)
                .expect("depot");
            for _ in 0..num_clients {
                let (x, y) = loop {
                    let p = (rng.random_range(0..=100), rng.random_range(0..=100));
                    if !taken.contains(&p) {
                        taken.push(p);
                        break p;
                    }
                };
                let start = rng.random_range(0..=1000);
                let length = rng.random_range(0..=100);
                let reward = rng.random_range(0..=100) as f64;
                instance
                    .add_location(
                        vec![iv(start, start + length)],
                        x as f64,
                        y as f64,
                        reward,
                    )
                    .expect("client");
            }
            instance
        }

        #[test]
        fn test_matches_brute_force_on_small_instances() {
            let mut rng = StdRng::seed_from_u64(42);
            for trial in 0..30 {
                let num_clients = 1 + trial % 6;
                let instance = random_instance(&mut rng, num_clients);
                let tour = solve(&instance);
                let expected = brute_force_cost(&instance);
                assert_eq!(
                    tour.cost(),
                    expected,
                    "trial {} with {} clients",
                    trial,
                    num_clients
                );
            }
        }
    }
}
