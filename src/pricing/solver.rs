//! Pricing callbacks for a column-generation master.
//!
//! The master is a set-covering LP with one row per location; row 0 is
//! the vehicle-count row every column covers. The reduced cost of a tour
//! column is its travel distance minus the duals of the rows it covers.
//! Rewarding each destination with its own dual reproduces that sum
//! arc-by-arc: interior arcs pick up the destination dual, and the depot
//! dual rides on the closing arc.

use log::debug;
use thiserror::Error;

use crate::labeling;
use crate::models::{Instance, InstanceError, Tour};
use crate::search::{iterative_beam_search, IterativeBeamConfig, TourBranching};

use super::column::{assemble_column, Column};

/// Reduced costs above this threshold are treated as non-negative; LP
/// duals are floating-point and hover around zero at convergence.
const REDUCED_COST_TOLERANCE: f64 = -1e-9;

/// Structural failures of the pricing callbacks.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The dual vector does not match the instance's location count.
    #[error("dual vector has {actual} entries, expected {expected}")]
    DualLengthMismatch {
        /// Number of locations in the instance.
        expected: usize,
        /// Number of duals supplied.
        actual: usize,
    },
    /// The restricted pricing instance could not be built.
    #[error(transparent)]
    Instance(#[from] InstanceError),
}

/// Subproblem engine used by [`PricingSolver::solve_pricing`].
#[derive(Debug, Clone)]
pub enum PricingEngine {
    /// Label-correcting DP over each location's earliest interval.
    Labeling,
    /// Anytime tree search over all intervals.
    TreeSearch(IterativeBeamConfig),
}

/// Generates negative-reduced-cost tour columns on demand.
///
/// # Examples
///
/// ```
/// use espptw::models::{Instance, VisitInterval};
/// use espptw::pricing::{PricingEngine, PricingSolver};
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// instance.add_location(vec![iv], 3.0, 4.0, 0.0).unwrap();
///
/// let mut solver = PricingSolver::new(&instance, PricingEngine::Labeling);
/// solver.initialize_pricing(&[], &[]);
/// // Dual 20 on the client row prices the round trip at 10 - 20 < 0.
/// let columns = solver.solve_pricing(&[0.0, 20.0]).unwrap();
/// assert_eq!(columns.len(), 1);
/// assert_eq!(columns[0].tour().locations(), &[1]);
/// assert_eq!(columns[0].objective(), 10.0);
/// ```
pub struct PricingSolver<'a> {
    instance: &'a Instance,
    engine: PricingEngine,
    covered: Vec<bool>,
}

impl<'a> PricingSolver<'a> {
    /// Creates a solver over the full instance; no location is covered
    /// until [`initialize_pricing`](Self::initialize_pricing) runs.
    pub fn new(instance: &'a Instance, engine: PricingEngine) -> Self {
        let mut covered = vec![false; instance.len()];
        if let Some(depot) = covered.first_mut() {
            *depot = true;
        }
        PricingSolver {
            instance,
            engine,
            covered,
        }
    }

    /// Recomputes the covered mask from the columns fixed in the current
    /// restricted master. A location is covered once its accumulated
    /// coefficient exceeds 0.5; the depot is always covered.
    pub fn initialize_pricing(&mut self, columns: &[Column], fixed_columns: &[(usize, f64)]) {
        let mut accumulated = vec![0.0; self.instance.len()];
        for &(column_id, value) in fixed_columns {
            let column = &columns[column_id];
            for (&row, &coefficient) in column
                .row_indices()
                .iter()
                .zip(column.row_coefficients())
            {
                accumulated[row] += value * coefficient;
            }
        }
        for (id, covered) in self.covered.iter_mut().enumerate() {
            *covered = id == 0 || accumulated[id] > 0.5;
        }
    }

    /// Prices the uncovered locations against the given duals.
    ///
    /// Returns at most one column, and only when its reduced cost is
    /// strictly negative; an empty vector signals pricing exhaustion.
    pub fn solve_pricing(&self, duals: &[f64]) -> Result<Vec<Column>, PricingError> {
        if duals.len() != self.instance.len() {
            return Err(PricingError::DualLengthMismatch {
                expected: self.instance.len(),
                actual: duals.len(),
            });
        }

        let mut restricted = Instance::new();
        let mut original_ids = Vec::new();
        for location in self.instance.locations() {
            let id = location.id();
            if id != 0 && self.covered[id] {
                continue;
            }
            restricted.add_location(
                location.intervals().to_vec(),
                location.x(),
                location.y(),
                duals[id],
            )?;
            original_ids.push(id);
        }

        let tour = match &self.engine {
            PricingEngine::Labeling => labeling::solve(&restricted),
            PricingEngine::TreeSearch(config) => {
                let mut scheme = TourBranching::new(&restricted);
                let result = iterative_beam_search(&mut scheme, config);
                match result.best {
                    Some(node) => scheme.to_tour(node),
                    None => Tour::empty(),
                }
            }
        };

        if tour.is_empty() || tour.cost() >= REDUCED_COST_TOLERANCE {
            debug!("pricing exhausted, best reduced cost {}", tour.cost());
            return Ok(Vec::new());
        }

        let path: Vec<usize> = tour
            .locations()
            .iter()
            .map(|&local| original_ids[local])
            .collect();
        debug!(
            "pricing found column over {:?} with reduced cost {}",
            path,
            tour.cost()
        );
        Ok(vec![assemble_column(self.instance, &path)])
    }
}
