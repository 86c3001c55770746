//! Instance exchange format.
//!
//! Instances travel as one JSON object of parallel per-location sequences:
//! `visit_intervals`, `xs`, `ys`, and optionally `values` (absent means
//! every reward is zero). Each entry of `visit_intervals` is either one
//! `[start, end]` pair or a list of pairs. Location 0 is the depot.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{Instance, VisitInterval};

use super::error::FormatError;

/// One location's intervals, either a bare pair or a list of pairs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum IntervalsRecord {
    One([i64; 2]),
    Many(Vec<[i64; 2]>),
}

impl IntervalsRecord {
    fn pairs(&self) -> &[[i64; 2]] {
        match self {
            IntervalsRecord::One(pair) => std::slice::from_ref(pair),
            IntervalsRecord::Many(pairs) => pairs,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct InstanceRecord {
    visit_intervals: Vec<IntervalsRecord>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<f64>>,
}

fn check_length(
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), FormatError> {
    if actual != expected {
        return Err(FormatError::MismatchedLengths {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Decodes an instance from its JSON text.
///
/// # Examples
///
/// ```
/// use espptw::io::instance_from_str;
///
/// let json = r#"{
///     "visit_intervals": [[0, 0], [[0, 10], [20, 30]]],
///     "xs": [0.0, 3.0],
///     "ys": [0.0, 4.0]
/// }"#;
/// let instance = instance_from_str(json).unwrap();
/// assert_eq!(instance.len(), 2);
/// assert_eq!(instance.location(1).reward(), 0.0);
/// assert_eq!(instance.location(1).intervals().len(), 2);
/// ```
pub fn instance_from_str(text: &str) -> Result<Instance, FormatError> {
    let record: InstanceRecord = serde_json::from_str(text)?;
    let n = record.visit_intervals.len();
    check_length("xs", n, record.xs.len())?;
    check_length("ys", n, record.ys.len())?;
    if let Some(values) = &record.values {
        check_length("values", n, values.len())?;
    }

    let mut instance = Instance::new();
    for (id, intervals) in record.visit_intervals.iter().enumerate() {
        let mut decoded = Vec::new();
        for &[start, end] in intervals.pairs() {
            let interval = VisitInterval::new(start, end).ok_or(
                FormatError::InvalidInterval {
                    location: id,
                    start,
                    end,
                },
            )?;
            decoded.push(interval);
        }
        let reward = record
            .values
            .as_ref()
            .map_or(0.0, |values| values[id]);
        instance.add_location(decoded, record.xs[id], record.ys[id], reward)?;
    }
    Ok(instance)
}

/// Encodes an instance as JSON text, always with explicit interval lists
/// and a `values` field.
pub fn instance_to_string(instance: &Instance) -> Result<String, FormatError> {
    let record = InstanceRecord {
        visit_intervals: instance
            .locations()
            .iter()
            .map(|location| {
                IntervalsRecord::Many(
                    location
                        .intervals()
                        .iter()
                        .map(|interval| [interval.start(), interval.end()])
                        .collect(),
                )
            })
            .collect(),
        xs: instance.locations().iter().map(|l| l.x()).collect(),
        ys: instance.locations().iter().map(|l| l.y()).collect(),
        values: Some(instance.locations().iter().map(|l| l.reward()).collect()),
    };
    Ok(serde_json::to_string(&record)?)
}

/// Reads an instance from a JSON file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance, FormatError> {
    instance_from_str(&fs::read_to_string(path)?)
}

/// Writes an instance to a JSON file.
pub fn write_instance(path: impl AsRef<Path>, instance: &Instance) -> Result<(), FormatError> {
    fs::write(path, instance_to_string(instance)?)?;
    Ok(())
}
