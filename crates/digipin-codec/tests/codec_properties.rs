//! Property tests for the DigiPIN codec
//!
//! These verify the codec laws across the whole coordinate space:
//! - Encoding then decoding lands inside the original cell
//! - Re-encoding a decoded center is stable
//! - Malformed and corrupted codes are rejected with the right error kind
//! - Distance is symmetric and non-negative

use digipin_codec::{
    checksum_for, distance_km, from_pin, geohash, to_pin, DigiPin, GeoCoordinate, PinError,
    PIN_LENGTH,
};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = GeoCoordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
        .prop_map(|(lat, lon)| GeoCoordinate::new(lat, lon).unwrap())
}

fn geohash_body() -> impl Strategy<Value = String> {
    proptest::collection::vec(0usize..32, 9).prop_map(|idx| {
        idx.into_iter()
            .map(|i| geohash::BASE32[i] as char)
            .collect()
    })
}

proptest! {
    #[test]
    fn pin_round_trip_stays_in_cell(p in coordinate()) {
        let pin = to_pin(&p);
        let center = from_pin(&pin).unwrap();
        let cell = DigiPin::parse(&pin).unwrap().cell();

        prop_assert!(cell.contains(&p));
        prop_assert!((center.latitude() - p.latitude()).abs() <= cell.lat_span() / 2.0 + 1e-12);
        prop_assert!((center.longitude() - p.longitude()).abs() <= cell.lon_span() / 2.0 + 1e-12);
    }

    #[test]
    fn re_encoding_center_is_stable(p in coordinate()) {
        let pin = to_pin(&p);
        let again = to_pin(&from_pin(&pin).unwrap());
        prop_assert_eq!(&again[3..12], &pin[3..12]);
        prop_assert_eq!(again, pin);
    }

    #[test]
    fn geohash_decode_encode_law(p in coordinate()) {
        let hash = geohash::encode(&p, 9);
        let center = geohash::decode(&hash).unwrap();
        prop_assert_eq!(geohash::encode(&center, 9), hash);
    }

    #[test]
    fn pin_format_invariants(p in coordinate()) {
        let pin = to_pin(&p);
        prop_assert_eq!(pin.len(), PIN_LENGTH);
        prop_assert!(pin.starts_with("DP-"));
        let body = pin[3..12].to_ascii_lowercase();
        prop_assert_eq!(pin.chars().last().unwrap(), checksum_for(&body));
    }

    #[test]
    fn wrong_length_is_invalid_format(text in "[A-Za-z0-9-]{0,30}") {
        prop_assume!(text.len() != PIN_LENGTH);
        prop_assert!(matches!(from_pin(&text), Err(PinError::InvalidFormat(_))));
    }

    #[test]
    fn wrong_prefix_is_invalid_format(body in geohash_body(), prefix in "[A-Z0-9]{3}") {
        prop_assume!(!prefix.eq_ignore_ascii_case("DP-"));
        let text = format!("{}{}{}", prefix, body.to_uppercase(), checksum_for(&body));
        prop_assert!(matches!(from_pin(&text), Err(PinError::InvalidFormat(_))));
    }

    #[test]
    fn altered_checksum_is_mismatch(body in geohash_body(), shift in 1u32..36) {
        let good = checksum_for(&body);
        let digit = good.to_digit(36).unwrap();
        let bad = std::char::from_digit((digit + shift) % 36, 36).unwrap().to_ascii_uppercase();
        let text = format!("DP-{}{}", body.to_uppercase(), bad);
        let is_mismatch = matches!(from_pin(&text), Err(PinError::ChecksumMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    #[test]
    fn lowercase_pins_parse_the_same(p in coordinate()) {
        let pin = to_pin(&p);
        prop_assert_eq!(from_pin(&pin.to_lowercase()).unwrap(), from_pin(&pin).unwrap());
    }

    #[test]
    fn distance_symmetric_and_non_negative(a in coordinate(), b in coordinate()) {
        let ab = distance_km(&a, &b);
        let ba = distance_km(&b, &a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert_eq!(distance_km(&a, &a), 0.0);
    }
}

#[cfg(feature = "serde")]
#[test]
fn digipin_serializes_as_text() {
    let pin: DigiPin = "dp-ttnfucjbhw".parse().unwrap();
    let json = serde_json::to_string(&pin).unwrap();
    assert_eq!(json, "\"DP-TTNFUCJBHW\"");

    let back: DigiPin = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pin);
    assert!(serde_json::from_str::<DigiPin>("\"DP-TTNFUCJBHX\"").is_err());
}
