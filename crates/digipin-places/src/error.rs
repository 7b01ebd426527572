//! Error types for place lookups

use digipin_codec::{CoordError, PinError};
use thiserror::Error;

/// Errors that can occur while resolving places
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaceError {
    /// The search / reverse-geocode provider failed
    #[error("place provider error: {0}")]
    Provider(String),

    /// A coordinate was out of range
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] CoordError),

    /// DigiPIN text could not be resolved
    #[error(transparent)]
    Pin(#[from] PinError),

    /// A latitude/longitude text field did not parse as a number
    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
