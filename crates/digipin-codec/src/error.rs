//! Error types for coordinate validation, geohash decoding and DigiPIN parsing

use thiserror::Error;

/// Errors raised when a latitude/longitude pair is not a valid coordinate
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// Errors that can occur while decoding a geohash
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeohashError {
    /// Nothing to decode
    #[error("empty geohash")]
    Empty,

    /// Symbol outside the base-32 geohash alphabet
    #[error("invalid geohash character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

/// Errors that can occur while parsing a DigiPIN
///
/// The two kinds are kept apart so callers can tell a malformed code from
/// a well-formed one with a transcription typo.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    /// Wrong length, wrong prefix, or a body that is not a geohash
    #[error("invalid DigiPIN format: {0}")]
    InvalidFormat(String),

    /// Checksum character does not match the embedded geohash
    #[error("DigiPIN checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: char, actual: char },
}
