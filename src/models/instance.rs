//! Problem instance: an ordered set of locations with a derived cost model.

use thiserror::Error;

use super::location::{Location, VisitInterval};

/// Errors raised when building an instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    /// A location was added with an empty interval list.
    #[error("location {location} has no visit intervals")]
    NoIntervals { location: usize },

    /// A location's intervals are out of order or overlap.
    #[error("location {location} has unordered or overlapping visit intervals")]
    OverlappingIntervals { location: usize },
}

/// An elementary shortest path instance.
///
/// Locations are identified by insertion order; the first location added
/// (id 0) is the depot. Travel durations are derived from coordinates on
/// demand, and arc costs subtract the destination's reward, so a negative
/// total cost means the collected rewards outweigh the distance travelled.
///
/// # Examples
///
/// ```
/// use espptw::models::{Instance, VisitInterval};
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// let id = instance.add_location(vec![iv], 3.0, 4.0, 2.0).unwrap();
///
/// assert_eq!(id, 1);
/// assert_eq!(instance.duration(0, 1), 5);
/// assert_eq!(instance.cost(0, 1), 3.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Instance {
    locations: Vec<Location>,
}

impl Instance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
        }
    }

    /// Adds a location and returns its ID.
    ///
    /// The interval list must be non-empty, sorted by start time, and
    /// pairwise disjoint (each interval must end no later than the next
    /// one starts).
    pub fn add_location(
        &mut self,
        intervals: Vec<VisitInterval>,
        x: f64,
        y: f64,
        reward: f64,
    ) -> Result<usize, InstanceError> {
        let id = self.locations.len();
        if intervals.is_empty() {
            return Err(InstanceError::NoIntervals { location: id });
        }
        for pair in intervals.windows(2) {
            if pair[0].end() > pair[1].start() {
                return Err(InstanceError::OverlappingIntervals { location: id });
            }
        }
        self.locations.push(Location::new(id, x, y, reward, intervals));
        Ok(id)
    }

    /// Number of locations, including the depot.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if no locations have been added.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of non-depot locations.
    pub fn num_clients(&self) -> usize {
        self.locations.len().saturating_sub(1)
    }

    /// All locations in ID order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The location with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn location(&self, id: usize) -> &Location {
        &self.locations[id]
    }

    /// Travel duration between two locations, rounded to the nearest
    /// integer. Symmetric and non-negative.
    ///
    /// # Panics
    ///
    /// Panics if either ID is out of range.
    pub fn duration(&self, from: usize, to: usize) -> i64 {
        self.locations[from].distance_to(&self.locations[to]).round() as i64
    }

    /// Cost of travelling an arc: the travel duration minus the reward
    /// collected at the destination. Asymmetric whenever rewards differ.
    ///
    /// # Panics
    ///
    /// Panics if either ID is out of range.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.duration(from, to) as f64 - self.locations[to].reward()
    }
}
