//! Place data exchanged with callers and collaborators

use digipin_codec::GeoCoordinate;
use serde::{Deserialize, Serialize};

use crate::error::PlaceError;

/// A raw search hit from a [`PlaceProvider`](crate::PlaceProvider)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Provider's identifier for the place
    pub place_id: u64,
    /// Human-readable label
    pub display_name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Landmark class (e.g. "amenity")
    #[serde(default)]
    pub class: Option<String>,
    /// Landmark type (e.g. "hospital")
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    /// Provider ranking score
    #[serde(default)]
    pub importance: Option<f64>,
}

/// A ranked search result with its DigiPIN attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub place_id: u64,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    pub digi_pin: String,
}

/// Reverse-geocoding answer for a coordinate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    pub display_name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
}

/// The place a user picked, ready for pinning, saving or dispatch
///
/// Serialized with the external field names (`digiPin`, `displayName`) and
/// coordinates as text, matching what saved-pin stores already hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPlaceData {
    pub digi_pin: String,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
}

impl SelectedPlaceData {
    /// Parse the stored latitude/longitude text back into a coordinate
    pub fn coordinate(&self) -> Result<GeoCoordinate, PlaceError> {
        let lat = parse_degrees("lat", &self.lat)?;
        let lon = parse_degrees("lon", &self.lon)?;
        Ok(GeoCoordinate::new(lat, lon)?)
    }
}

fn parse_degrees(field: &'static str, value: &str) -> Result<f64, PlaceError> {
    value
        .trim()
        .parse()
        .map_err(|_| PlaceError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
