//! Place search / reverse-geocoding collaborator contract

use async_trait::async_trait;
use digipin_codec::GeoCoordinate;

use crate::error::PlaceError;
use crate::models::{PlaceCandidate, ReverseGeocode};

/// A source of place names for text queries and coordinates
///
/// Implementations own transport, rate limiting and retries.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Ranked matches for free-text `query`
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, PlaceError>;

    /// Human label (and optional category tags) for a coordinate
    async fn reverse_geocode(&self, coord: &GeoCoordinate) -> Result<ReverseGeocode, PlaceError>;
}

/// Provider for offline use: no search hits and no labels
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl PlaceProvider for OfflineProvider {
    async fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, PlaceError> {
        Ok(Vec::new())
    }

    async fn reverse_geocode(&self, _coord: &GeoCoordinate) -> Result<ReverseGeocode, PlaceError> {
        Ok(ReverseGeocode::default())
    }
}
