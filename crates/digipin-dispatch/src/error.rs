//! Error types for the dispatch engine

use thiserror::Error;

/// Errors returned by an [`IncidentSink`](crate::IncidentSink)
///
/// The simulator never aborts on these; they become a warning log line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink refused the record
    #[error("incident rejected: {0}")]
    Rejected(String),

    /// The sink could not be reached
    #[error("incident sink unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading dispatch configuration or rosters
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for the expected shape
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors parsing dispatch requests
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Emergency type name not recognized
    #[error("unknown emergency type: {0:?} (expected ambulance, firefighter or police)")]
    UnknownEmergencyType(String),
}
