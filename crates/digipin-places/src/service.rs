//! Place resolution: attaches DigiPINs to provider results

use digipin_codec::{from_pin, to_pin, GeoCoordinate};
use tracing::{debug, warn};

use crate::error::PlaceError;
use crate::models::{Place, SelectedPlaceData};
use crate::provider::PlaceProvider;

/// Turns queries, coordinates and DigiPINs into [`Place`]s and
/// [`SelectedPlaceData`] using a [`PlaceProvider`] for labels
pub struct PlaceService<P> {
    provider: P,
}

impl<P: PlaceProvider> PlaceService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Search by free text; each hit gets its DigiPIN
    ///
    /// A blank query returns nothing without calling the provider. Hits with
    /// out-of-range coordinates are dropped.
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, PlaceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.provider.search(query).await?;
        debug!("Place search {:?} returned {} candidates", query, candidates.len());

        let places = candidates
            .into_iter()
            .filter_map(|c| match GeoCoordinate::new(c.lat, c.lon) {
                Ok(coord) => Some(Place {
                    place_id: c.place_id,
                    display_name: c.display_name,
                    lat: c.lat,
                    lon: c.lon,
                    class: c.class,
                    place_type: c.place_type,
                    importance: c.importance,
                    digi_pin: to_pin(&coord),
                }),
                Err(e) => {
                    warn!("Dropping search result {} ({}): {}", c.place_id, c.display_name, e);
                    None
                }
            })
            .collect();

        Ok(places)
    }

    /// Selected-place record for a coordinate
    ///
    /// Reverse-geocoding failures are not fatal: the label falls back to the
    /// coordinate itself.
    pub async fn place_for_coordinate(&self, coord: &GeoCoordinate) -> SelectedPlaceData {
        let mut place = SelectedPlaceData {
            digi_pin: to_pin(coord),
            display_name: fallback_label(coord),
            lat: coord.latitude().to_string(),
            lon: coord.longitude().to_string(),
            class: None,
            place_type: None,
        };

        match self.provider.reverse_geocode(coord).await {
            Ok(found) => {
                if let Some(name) = found.display_name {
                    place.display_name = name;
                }
                place.class = found.class;
                place.place_type = found.place_type;
            }
            Err(e) => warn!("Reverse geocoding failed for {}: {}", coord, e),
        }

        place
    }

    /// Resolve DigiPIN text to a selected place at the cell center
    pub async fn place_for_pin(&self, pin: &str) -> Result<SelectedPlaceData, PlaceError> {
        let center = from_pin(pin)?;
        Ok(self.place_for_coordinate(&center).await)
    }
}

fn fallback_label(coord: &GeoCoordinate) -> String {
    format!(
        "Location at {:.4}, {:.4}",
        coord.latitude(),
        coord.longitude()
    )
}
