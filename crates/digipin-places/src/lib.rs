//! DigiPIN Places Library
//!
//! Glue between a place search / reverse-geocoding provider and the DigiPIN
//! codec. The provider is an opaque collaborator behind [`PlaceProvider`];
//! this crate only attaches DigiPINs, builds [`SelectedPlaceData`] records
//! and keeps a bounded lookup history.

pub mod error;
pub mod history;
pub mod models;
pub mod provider;
pub mod service;

pub use error::PlaceError;
pub use history::{LookupHistory, HISTORY_LIMIT};
pub use models::{Place, PlaceCandidate, ReverseGeocode, SelectedPlaceData};
pub use provider::{OfflineProvider, PlaceProvider};
pub use service::PlaceService;
