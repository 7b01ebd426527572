//! Geographic coordinate type

use std::fmt;

use crate::error::CoordError;

/// Minimum valid latitude in degrees
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees
pub const MAX_LON: f64 = 180.0;

/// A validated latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from values that are in range by construction (cell centers, bisection midpoints)
    pub(crate) fn from_parts(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns `(latitude, longitude)`
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Wire form, checked through [`GeoCoordinate::new`] on the way in
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = CoordError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_range_limits() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            GeoCoordinate::new(90.5, 0.0),
            Err(CoordError::InvalidLatitude(90.5))
        );
        assert_eq!(
            GeoCoordinate::new(0.0, -180.1),
            Err(CoordError::InvalidLongitude(-180.1))
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            GeoCoordinate::new(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoCoordinate::new(0.0, f64::INFINITY),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_range() {
        let coord: GeoCoordinate =
            serde_json::from_str(r#"{"latitude":28.6139,"longitude":77.209}"#).unwrap();
        assert_eq!(coord, GeoCoordinate::new(28.6139, 77.209).unwrap());

        let err = serde_json::from_str::<GeoCoordinate>(r#"{"latitude":500.0,"longitude":-999.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid latitude"));
        assert!(serde_json::from_str::<GeoCoordinate>(r#"{"latitude":0.0,"longitude":181.0}"#)
            .is_err());
    }
}
