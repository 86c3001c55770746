//! Master-problem columns and their assembly from tours.

use crate::models::{Instance, Tour};

/// One column of the set-covering master problem.
///
/// Row 0 is the vehicle-count row; every other row index is the id of a
/// visited location, each with coefficient 1. The objective coefficient is
/// the tour's true travel distance, not its reduced cost. The tour itself
/// is kept so callers can reconstruct a certificate from a selected basis.
#[derive(Debug, Clone)]
pub struct Column {
    row_indices: Vec<usize>,
    row_coefficients: Vec<f64>,
    objective: f64,
    tour: Tour,
}

impl Column {
    /// Covered row indices, row 0 first.
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Coefficients parallel to [`row_indices`](Self::row_indices).
    pub fn row_coefficients(&self) -> &[f64] {
        &self.row_coefficients
    }

    /// True travel distance of the underlying tour.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// The tour this column stands for.
    pub fn tour(&self) -> &Tour {
        &self.tour
    }
}

/// Builds the master-problem column for a depot-to-depot tour visiting
/// `path` in order.
///
/// The objective coefficient sums the travelled durations, including the
/// closing arc back to the depot. An empty path yields a placeholder
/// column covering nothing at zero cost.
///
/// # Examples
///
/// ```
/// use espptw::models::{Instance, VisitInterval};
/// use espptw::pricing::assemble_column;
///
/// let mut instance = Instance::new();
/// let depot = VisitInterval::new(0, 0).unwrap();
/// instance.add_location(vec![depot], 0.0, 0.0, 0.0).unwrap();
/// let iv = VisitInterval::new(0, 100).unwrap();
/// instance.add_location(vec![iv], 3.0, 4.0, 0.0).unwrap();
///
/// let column = assemble_column(&instance, &[1]);
/// assert_eq!(column.row_indices(), &[0, 1]);
/// assert_eq!(column.objective(), 10.0);
/// ```
pub fn assemble_column(instance: &Instance, path: &[usize]) -> Column {
    if path.is_empty() {
        return Column {
            row_indices: Vec::new(),
            row_coefficients: Vec::new(),
            objective: 0.0,
            tour: Tour::empty(),
        };
    }

    let mut row_indices = vec![0];
    let mut row_coefficients = vec![1.0];
    let mut objective = 0.0;
    let mut cost = 0.0;
    let mut last = 0;
    for &id in path {
        row_indices.push(id);
        row_coefficients.push(1.0);
        objective += instance.duration(last, id) as f64;
        cost += instance.cost(last, id);
        last = id;
    }
    objective += instance.duration(last, 0) as f64;
    cost += instance.cost(last, 0);

    Column {
        row_indices,
        row_coefficients,
        objective,
        tour: Tour::new(path.to_vec(), cost),
    }
}
