//! DigiPIN Codec Library
//!
//! Deterministic, human-shareable location codes built on geohashes:
//!
//! - **geohash**: bit-interleaved coordinate quantizer with a base-32 alphabet
//! - **pin**: the 13-character `DP-` envelope with a typo-catching checksum
//! - **distance**: haversine great-circle distance
//!
//! # Example
//!
//! ```rust
//! use digipin_codec::{from_pin, to_pin, GeoCoordinate, PinError};
//!
//! let delhi = GeoCoordinate::new(28.6139, 77.2090).unwrap();
//! let pin = to_pin(&delhi);
//! assert_eq!(pin, "DP-TTNFUCJBHW");
//!
//! let center = from_pin(&pin).unwrap();
//! assert!((center.latitude() - 28.6139).abs() < 1e-4);
//!
//! assert!(matches!(from_pin("DP-TTNFUCJBHX"), Err(PinError::ChecksumMismatch { .. })));
//! ```

pub mod coordinate;
pub mod distance;
pub mod error;
pub mod geohash;
pub mod pin;

pub use coordinate::GeoCoordinate;
pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use error::{CoordError, GeohashError, PinError};
pub use geohash::{Direction, GeohashBounds, DIGIPIN_PRECISION};
pub use pin::{checksum_for, from_pin, to_pin, to_pin_lat_lon, DigiPin, PIN_LENGTH, PIN_PREFIX};
