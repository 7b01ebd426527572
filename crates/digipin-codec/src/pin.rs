//! DigiPIN text format
//!
//! A DigiPIN is `DP-` followed by a 9-symbol geohash (rendered uppercase)
//! and one checksum character, 13 characters in total:
//!
//! ```text
//! DP-TTNFUCJBHW
//! ^^^ prefix
//!    ^^^^^^^^^ geohash body
//!             ^ checksum
//! ```
//!
//! The checksum is the last base-36 digit of the sum of the character codes
//! of the *lowercase* geohash. It only catches transcription typos; it is not
//! an integrity check and must stay as-is to keep existing codes valid.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use tracing::debug;

use crate::coordinate::GeoCoordinate;
use crate::error::{CoordError, PinError};
use crate::geohash::{self, Direction, GeohashBounds, DIGIPIN_PRECISION};

/// Fixed prefix of every DigiPIN
pub const PIN_PREFIX: &str = "DP-";

/// Total DigiPIN length
pub const PIN_LENGTH: usize = PIN_PREFIX.len() + DIGIPIN_PRECISION + 1;

const BASE36_UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Checksum character for a geohash body
///
/// The body must already be lowercase; the character codes of the lowercase
/// symbols are what get summed.
pub fn checksum_for(geohash: &str) -> char {
    let sum: u32 = geohash.chars().map(|c| c as u32).sum();
    BASE36_UPPER[(sum % 36) as usize] as char
}

/// A parsed, checksum-verified DigiPIN
#[derive(Debug, Clone)]
pub struct DigiPin {
    /// Lowercase geohash body
    geohash: String,
    /// Cell named by the body
    cell: GeohashBounds,
}

impl DigiPin {
    /// DigiPIN for the cell containing `coord`
    pub fn from_coordinate(coord: &GeoCoordinate) -> Self {
        let (geohash, cell) = geohash::encode_cell(coord, DIGIPIN_PRECISION);
        Self { geohash, cell }
    }

    /// Parse and verify DigiPIN text
    pub fn parse(text: &str) -> Result<Self, PinError> {
        let pin = text.trim();

        // Counted in chars so a non-ASCII checksum reads as a typo
        let chars: Vec<char> = pin.chars().collect();
        if chars.len() != PIN_LENGTH {
            return Err(PinError::InvalidFormat(format!(
                "expected {} characters, got {:?}",
                PIN_LENGTH, pin
            )));
        }
        let prefix: String = chars[..PIN_PREFIX.len()].iter().collect();
        if !prefix.eq_ignore_ascii_case(PIN_PREFIX) {
            return Err(PinError::InvalidFormat(format!(
                "missing {:?} prefix in {:?}",
                PIN_PREFIX, pin
            )));
        }

        let body_end = PIN_LENGTH - 1;
        let geohash: String = chars[PIN_PREFIX.len()..body_end]
            .iter()
            .map(char::to_ascii_lowercase)
            .collect();
        let actual = chars[body_end].to_ascii_uppercase();
        let expected = checksum_for(&geohash);

        if actual != expected {
            debug!(
                "DigiPIN checksum mismatch for geohash {}: provided {}, calculated {}",
                geohash, actual, expected
            );
            return Err(PinError::ChecksumMismatch { expected, actual });
        }

        let cell = geohash::decode_bounds(&geohash)
            .map_err(|e| PinError::InvalidFormat(e.to_string()))?;

        Ok(Self { geohash, cell })
    }

    /// Lowercase 9-symbol geohash body
    pub fn geohash(&self) -> &str {
        &self.geohash
    }

    /// Uppercase checksum character
    pub fn checksum(&self) -> char {
        checksum_for(&self.geohash)
    }

    /// Center of the encoded cell
    pub fn coordinate(&self) -> GeoCoordinate {
        self.cell.center()
    }

    /// Extent of the encoded cell
    pub fn cell(&self) -> GeohashBounds {
        self.cell
    }

    /// Adjacent DigiPINs clockwise from north, skipping any past a pole
    pub fn neighbors(&self) -> Vec<(Direction, DigiPin)> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                geohash::adjacent_center(&self.cell, direction)
                    .map(|center| (direction, DigiPin::from_coordinate(&center)))
            })
            .collect()
    }
}

impl PartialEq for DigiPin {
    fn eq(&self, other: &Self) -> bool {
        self.geohash == other.geohash
    }
}

impl Eq for DigiPin {}

impl Hash for DigiPin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.geohash.hash(state);
    }
}

impl fmt::Display for DigiPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            PIN_PREFIX,
            self.geohash.to_ascii_uppercase(),
            self.checksum()
        )
    }
}

impl FromStr for DigiPin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DigiPin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DigiPin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// DigiPIN text for a validated coordinate
pub fn to_pin(coord: &GeoCoordinate) -> String {
    DigiPin::from_coordinate(coord).to_string()
}

/// DigiPIN text for a raw latitude/longitude pair
pub fn to_pin_lat_lon(lat: f64, lon: f64) -> Result<String, CoordError> {
    GeoCoordinate::new(lat, lon).map(|coord| to_pin(&coord))
}

/// Cell-center coordinate for DigiPIN text
pub fn from_pin(text: &str) -> Result<GeoCoordinate, PinError> {
    DigiPin::parse(text).map(|pin| pin.coordinate())
}
