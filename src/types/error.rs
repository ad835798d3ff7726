//! Error types for the metric store
//!
//! Write-path failures propagate to the caller unchanged; the store performs
//! no retries. On the read path, a missing metric file is not an error.

use std::io;

/// Result type for metric store operations
pub type MetricStoreResult<T> = Result<T, MetricStoreError>;

/// Errors that can occur while writing, reading, or decoding metrics
#[derive(Debug)]
pub enum MetricStoreError {
    /// The directory containing a metric file could not be created
    DirectoryCreationFailed(io::Error),
    /// Appending a metric line to its file failed
    WriteFailed(io::Error),
    /// A metric file (or the output directory) exists but could not be read
    ReadFailed(io::Error),
    /// The timestamp field of a metric line is not valid RFC 3339
    MalformedTimestamp(String),
    /// The metric-type field is not part of the known enumeration
    UnknownMetricType(String),
    /// The payload, token, or error field is not valid JSON
    MalformedPayload(serde_json::Error),
    /// The line's type tag or field count does not match any record variant
    MalformedRecord(String),
}

impl std::fmt::Display for MetricStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricStoreError::DirectoryCreationFailed(e) => {
                write!(f, "Failed to create metric directory: {}", e)
            }
            MetricStoreError::WriteFailed(e) => write!(f, "Failed to append metric: {}", e),
            MetricStoreError::ReadFailed(e) => write!(f, "Failed to read metrics: {}", e),
            MetricStoreError::MalformedTimestamp(raw) => {
                write!(f, "Malformed timestamp: {:?}", raw)
            }
            MetricStoreError::UnknownMetricType(raw) => {
                write!(f, "Unknown metric type: {:?}", raw)
            }
            MetricStoreError::MalformedPayload(e) => write!(f, "Malformed payload: {}", e),
            MetricStoreError::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
        }
    }
}

impl std::error::Error for MetricStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricStoreError::DirectoryCreationFailed(e)
            | MetricStoreError::WriteFailed(e)
            | MetricStoreError::ReadFailed(e) => Some(e),
            MetricStoreError::MalformedPayload(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MetricStoreError {
    fn from(e: serde_json::Error) -> Self {
        MetricStoreError::MalformedPayload(e)
    }
}
