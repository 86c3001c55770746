//! Errors raised while reading or writing exchange files.

use thiserror::Error;

use crate::models::InstanceError;

/// Failure to read, parse, or validate an exchange file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Underlying file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The payload is not the expected JSON shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The decoded locations do not form a valid instance.
    #[error(transparent)]
    Instance(#[from] InstanceError),
    /// Parallel per-location sequences disagree in length.
    #[error("field {field} has {actual} entries, expected {expected}")]
    MismatchedLengths {
        /// Name of the offending field.
        field: &'static str,
        /// Length of `visit_intervals`.
        expected: usize,
        /// Length actually found.
        actual: usize,
    },
    /// An interval ends before it starts.
    #[error("location {location} has malformed interval [{start}, {end}]")]
    InvalidInterval {
        /// Index of the offending location.
        location: usize,
        /// Interval start.
        start: i64,
        /// Interval end.
        end: i64,
    },
}
