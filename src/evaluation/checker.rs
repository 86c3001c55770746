//! Certificate replay against an instance.
//!
//! A certificate is a visit order, not a schedule; the replay rebuilds the
//! timing greedily. Each visit takes the minimum-end interval whose start
//! admits the arrival, and the clock jumps to that interval's end. The
//! depot departure time is unconstrained, so the first visit of a route is
//! never late. A missed visit flags the route late but leaves the clock
//! unchanged, so later visits are still judged.

use crate::models::{Instance, Location};

/// Replay report for a single depot-to-depot tour.
#[derive(Debug, Clone, PartialEq)]
pub struct TourCheck {
    /// Number of repeated visits.
    pub duplicates: usize,
    /// Every visit caught one of its intervals.
    pub on_time: bool,
    /// No duplicates, on time, and the depot never appears.
    pub feasible: bool,
    /// Travel durations minus collected rewards, closing arc included.
    pub cost: f64,
}

/// Replay report for a multi-route plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCheck {
    /// Number of repeated visits across all routes.
    pub duplicates: usize,
    /// Every visit of every route caught one of its intervals.
    pub on_time: bool,
    /// No duplicates, on time, and the depot never appears.
    pub feasible: bool,
    /// Total travelled duration over all routes, closing arcs included.
    pub total_distance: i64,
}

fn visit(location: &Location, current: Option<i64>, travel: i64) -> Option<i64> {
    let arrival = current.map(|time| time + travel);
    location
        .intervals()
        .iter()
        .filter(|interval| arrival.is_none_or(|t| interval.admits(t)))
        .min_by_key(|interval| interval.end())
        .map(|interval| interval.end())
}

/// Replays a single tour certificate and recomputes its cost.
///
/// The empty tour is feasible with cost 0.
///
/// # Panics
///
/// Panics if the certificate names a location id outside the instance.
///
/// # Examples
///
/// ```
/// use espptw::evaluation::check_tour;
/// use espptw::models::{Instance, VisitInterval};
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// instance.add_location(vec![iv], 3.0, 4.0, 0.0).unwrap();
///
/// let check = check_tour(&instance, &[1]);
/// assert!(check.feasible);
/// assert_eq!(check.cost, 10.0);
/// ```
pub fn check_tour(instance: &Instance, locations: &[usize]) -> TourCheck {
    let mut on_time = true;
    let mut cost = 0.0;
    let mut current: Option<i64> = None;
    let mut prev = 0;
    for &id in locations {
        let travel = instance.duration(prev, id);
        match visit(instance.location(id), current, travel) {
            Some(end) => current = Some(end),
            None => on_time = false,
        }
        cost += instance.cost(prev, id);
        prev = id;
    }
    if !locations.is_empty() {
        cost += instance.cost(prev, 0);
    }

    let duplicates = count_duplicates(locations.iter().copied());
    let feasible = duplicates == 0 && on_time && !locations.contains(&0);
    TourCheck {
        duplicates,
        on_time,
        feasible,
        cost,
    }
}

/// Replays a multi-route plan certificate.
///
/// The objective is the total travelled duration; rewards do not enter.
/// Duplicates are counted across the whole plan, so a location served by
/// two different routes is flagged.
///
/// # Panics
///
/// Panics if the certificate names a location id outside the instance.
pub fn check_plan(instance: &Instance, routes: &[Vec<usize>]) -> PlanCheck {
    let mut on_time = true;
    let mut total_distance = 0;
    for route in routes {
        let mut current: Option<i64> = None;
        let mut prev = 0;
        for &id in route {
            let travel = instance.duration(prev, id);
            total_distance += travel;
            match visit(instance.location(id), current, travel) {
                Some(end) => current = Some(end),
                None => on_time = false,
            }
            prev = id;
        }
        total_distance += instance.duration(prev, 0);
    }

    let duplicates = count_duplicates(routes.iter().flatten().copied());
    let depot_visited = routes.iter().flatten().any(|&id| id == 0);
    let feasible = duplicates == 0 && on_time && !depot_visited;
    PlanCheck {
        duplicates,
        on_time,
        feasible,
        total_distance,
    }
}

fn count_duplicates(ids: impl Iterator<Item = usize>) -> usize {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = 0;
    for id in ids {
        if !seen.insert(id) {
            duplicates += 1;
        }
    }
    duplicates
}
