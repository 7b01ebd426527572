//! Geohash encoding and decoding
//!
//! A geohash is built by alternately bisecting the longitude and latitude
//! ranges, starting with longitude. Each bisection contributes one bit (1 when
//! the value lies in the upper half), and every 5 bits become one symbol of
//! the base-32 alphabet below.
//!
//! Decoding replays the bisections and yields the cell, whose center is the
//! canonical coordinate for that hash. Re-encoding a decoded center always
//! reproduces the same hash.

use crate::coordinate::{GeoCoordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::error::GeohashError;

/// Geohash symbol alphabet (no `a`, `i`, `l`, `o`)
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Geohash length used for DigiPINs (sub-meter cells)
pub const DIGIPIN_PRECISION: usize = 9;

/// Bit masks for the 5 bits of a symbol, most significant first
const BITS: [u8; 5] = [16, 8, 4, 2, 1];

/// Latitude/longitude extent of a geohash cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeohashBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeohashBounds {
    fn world() -> Self {
        Self {
            min_lat: MIN_LAT,
            max_lat: MAX_LAT,
            min_lon: MIN_LON,
            max_lon: MAX_LON,
        }
    }

    /// Midpoint of the cell
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::from_parts(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Cell height in degrees
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Cell width in degrees
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Whether the coordinate falls inside the cell (edges inclusive)
    pub fn contains(&self, coord: &GeoCoordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.latitude())
            && (self.min_lon..=self.max_lon).contains(&coord.longitude())
    }
}

/// Compass direction of an adjacent cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Offset in cells as `(rows north, columns east)`
    fn offset(self) -> (f64, f64) {
        match self {
            Direction::North => (1.0, 0.0),
            Direction::NorthEast => (1.0, 1.0),
            Direction::East => (0.0, 1.0),
            Direction::SouthEast => (-1.0, 1.0),
            Direction::South => (-1.0, 0.0),
            Direction::SouthWest => (-1.0, -1.0),
            Direction::West => (0.0, -1.0),
            Direction::NorthWest => (1.0, -1.0),
        }
    }
}

/// Encode a coordinate as a geohash of `precision` symbols
pub fn encode(coord: &GeoCoordinate, precision: usize) -> String {
    encode_cell(coord, precision).0
}

/// Encode a coordinate, also returning the cell the bisection narrowed to
pub(crate) fn encode_cell(coord: &GeoCoordinate, precision: usize) -> (String, GeohashBounds) {
    let mut lat_range = (MIN_LAT, MAX_LAT);
    let mut lon_range = (MIN_LON, MAX_LON);
    let mut hash = String::with_capacity(precision);
    let mut even = true;
    let mut bit = 0;
    let mut ch = 0u8;

    while hash.len() < precision {
        let (range, value) = if even {
            (&mut lon_range, coord.longitude())
        } else {
            (&mut lat_range, coord.latitude())
        };

        let mid = (range.0 + range.1) / 2.0;
        if value > mid {
            ch |= BITS[bit];
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        even = !even;

        if bit < 4 {
            bit += 1;
        } else {
            hash.push(BASE32[ch as usize] as char);
            bit = 0;
            ch = 0;
        }
    }

    let cell = GeohashBounds {
        min_lat: lat_range.0,
        max_lat: lat_range.1,
        min_lon: lon_range.0,
        max_lon: lon_range.1,
    };
    (hash, cell)
}

/// Look up the 5-bit value of a geohash symbol
fn symbol_value(ch: char) -> Option<u8> {
    BASE32
        .iter()
        .position(|&b| b as char == ch)
        .map(|idx| idx as u8)
}

/// Decode a geohash to the cell it names
pub fn decode_bounds(hash: &str) -> Result<GeohashBounds, GeohashError> {
    if hash.is_empty() {
        return Err(GeohashError::Empty);
    }

    let mut bounds = GeohashBounds::world();
    let mut even = true;

    for (position, ch) in hash.chars().enumerate() {
        let value = symbol_value(ch).ok_or(GeohashError::InvalidCharacter { ch, position })?;

        for mask in BITS {
            let upper = value & mask != 0;
            if even {
                let mid = (bounds.min_lon + bounds.max_lon) / 2.0;
                if upper {
                    bounds.min_lon = mid;
                } else {
                    bounds.max_lon = mid;
                }
            } else {
                let mid = (bounds.min_lat + bounds.max_lat) / 2.0;
                if upper {
                    bounds.min_lat = mid;
                } else {
                    bounds.max_lat = mid;
                }
            }
            even = !even;
        }
    }

    Ok(bounds)
}

/// Decode a geohash to its cell center
pub fn decode(hash: &str) -> Result<GeoCoordinate, GeohashError> {
    decode_bounds(hash).map(|bounds| bounds.center())
}

/// Geohash of the same length for the cell adjacent in `direction`
///
/// Longitude wraps across the antimeridian. Returns `None` when the
/// neighbor would lie beyond a pole.
pub fn neighbor(hash: &str, direction: Direction) -> Result<Option<String>, GeohashError> {
    let bounds = decode_bounds(hash)?;
    Ok(adjacent_center(&bounds, direction).map(|p| encode(&p, hash.chars().count())))
}

/// Center of the same-sized cell next to `bounds`, or `None` past a pole
pub(crate) fn adjacent_center(
    bounds: &GeohashBounds,
    direction: Direction,
) -> Option<GeoCoordinate> {
    let center = bounds.center();
    let (rows, cols) = direction.offset();

    let lat = center.latitude() + rows * bounds.lat_span();
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return None;
    }

    let mut lon = center.longitude() + cols * bounds.lon_span();
    if lon > MAX_LON {
        lon -= 360.0;
    } else if lon < MIN_LON {
        lon += 360.0;
    }

    Some(GeoCoordinate::from_parts(lat, lon))
}

/// All existing neighbors of a cell, clockwise from north
pub fn neighbors(hash: &str) -> Result<Vec<(Direction, String)>, GeohashError> {
    let mut out = Vec::with_capacity(Direction::ALL.len());
    for direction in Direction::ALL {
        if let Some(adjacent) = neighbor(hash, direction)? {
            out.push((direction, adjacent));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_encode_known_location() {
        // Reference value from the canonical geohash test suite
        assert_eq!(encode(&coord(57.64911, 10.40744), 9), "u4pruydqq");
    }

    #[test]
    fn test_encode_extremes() {
        assert_eq!(encode(&coord(-90.0, -180.0), 9), "000000000");
        assert_eq!(encode(&coord(90.0, 180.0), 9), "zzzzzzzzz");
    }

    #[test]
    fn test_encode_precision() {
        for precision in [1, 5, 9, 12] {
            assert_eq!(encode(&coord(28.6139, 77.2090), precision).len(), precision);
        }
    }

    #[test]
    fn test_decode_returns_cell_center() {
        let bounds = decode_bounds("u4pruydqq").unwrap();
        let center = decode("u4pruydqq").unwrap();

        assert!(bounds.contains(&center));
        assert!((center.latitude() - (bounds.min_lat + bounds.max_lat) / 2.0).abs() < 1e-12);
        assert!((center.latitude() - 57.64911).abs() < bounds.lat_span());
        assert!((center.longitude() - 10.40744).abs() < bounds.lon_span());
    }

    #[test]
    fn test_nine_symbol_cells_are_sub_meter_scale() {
        let bounds = decode_bounds("ttnfucjbh").unwrap();
        // ~4.8m x 4.8m at the equator, so half-cell error is a few meters at most
        assert!(bounds.lat_span() < 5e-5);
        assert!(bounds.lon_span() < 5e-5);
    }

    #[test]
    fn test_encode_cell_matches_decoded_bounds() {
        let (hash, cell) = encode_cell(&coord(19.0760, 72.8777), 9);
        assert_eq!(hash, "te7ud2evv");
        assert_eq!(decode_bounds(&hash).unwrap(), cell);
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(""), Err(GeohashError::Empty));
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        assert_eq!(
            decode("u4pra"),
            Err(GeohashError::InvalidCharacter { ch: 'a', position: 4 })
        );
        assert!(matches!(
            decode("U4PRU"),
            Err(GeohashError::InvalidCharacter { ch: 'U', position: 0 })
        ));
    }

    #[test]
    fn test_cardinal_neighbors() {
        assert_eq!(neighbor("gbsuv", Direction::North).unwrap().as_deref(), Some("gbsvj"));
        assert_eq!(neighbor("gbsuv", Direction::East).unwrap().as_deref(), Some("gbsuy"));
        assert_eq!(neighbor("gbsuv", Direction::South).unwrap().as_deref(), Some("gbsut"));
        assert_eq!(neighbor("gbsuv", Direction::West).unwrap().as_deref(), Some("gbsuu"));
    }

    #[test]
    fn test_neighbor_wraps_antimeridian() {
        let east_edge = encode(&coord(10.0, 179.99), 5);
        let west_edge = encode(&coord(10.0, -179.99), 5);

        assert_eq!(
            neighbor(&east_edge, Direction::East).unwrap(),
            Some(west_edge.clone())
        );
        assert_eq!(neighbor(&west_edge, Direction::West).unwrap(), Some(east_edge));
    }

    #[test]
    fn test_no_neighbor_past_pole() {
        let top = encode(&coord(89.99, 0.0), 5);
        assert_eq!(neighbor(&top, Direction::North).unwrap(), None);
        assert_eq!(neighbor(&top, Direction::NorthEast).unwrap(), None);
        assert_eq!(neighbors(&top).unwrap().len(), 5);
    }

    #[test]
    fn test_neighbors_are_distinct_and_same_length() {
        let all = neighbors("ttnfucjbh").unwrap();
        assert_eq!(all.len(), 8);
        for (_, hash) in &all {
            assert_eq!(hash.len(), 9);
            assert_ne!(hash, "ttnfucjbh");
        }
    }
}
