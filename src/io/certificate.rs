//! Certificate exchange format.
//!
//! A certificate is a JSON object whose `locations` field is either one
//! visit sequence (a single tour) or a list of sequences (a multi-route
//! plan). The depot id 0 is implicit at both ends of every route.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::FormatError;

/// Decoded certificate payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Certificate {
    /// A single depot-to-depot tour.
    Path(Vec<usize>),
    /// One visit sequence per route.
    Routes(Vec<Vec<usize>>),
}

#[derive(Debug, Serialize, Deserialize)]
struct CertificateRecord {
    locations: Certificate,
}

/// Decodes a certificate from its JSON text.
///
/// # Examples
///
/// ```
/// use espptw::io::{certificate_from_str, Certificate};
///
/// let single = certificate_from_str(r#"{"locations": [3, 1, 2]}"#).unwrap();
/// assert_eq!(single, Certificate::Path(vec![3, 1, 2]));
///
/// let plan = certificate_from_str(r#"{"locations": [[1], [2, 3]]}"#).unwrap();
/// assert_eq!(plan, Certificate::Routes(vec![vec![1], vec![2, 3]]));
/// ```
pub fn certificate_from_str(text: &str) -> Result<Certificate, FormatError> {
    let record: CertificateRecord = serde_json::from_str(text)?;
    Ok(record.locations)
}

/// Encodes a certificate as JSON text.
pub fn certificate_to_string(certificate: &Certificate) -> Result<String, FormatError> {
    let record = CertificateRecord {
        locations: certificate.clone(),
    };
    Ok(serde_json::to_string(&record)?)
}

/// Reads a certificate from a JSON file.
pub fn read_certificate(path: impl AsRef<Path>) -> Result<Certificate, FormatError> {
    certificate_from_str(&fs::read_to_string(path)?)
}

/// Writes a certificate to a JSON file.
pub fn write_certificate(
    path: impl AsRef<Path>,
    certificate: &Certificate,
) -> Result<(), FormatError> {
    fs::write(path, certificate_to_string(certificate)?)?;
    Ok(())
}
