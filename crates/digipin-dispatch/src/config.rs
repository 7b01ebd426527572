//! Dispatch configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest initial ETA a configuration may produce, in minutes
pub const MAX_ETA_MINUTES: u32 = 24 * 60;

/// Real-time pacing of a run, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay between "call received" and the search starting
    pub call_received_ms: u64,
    /// Delay while searching for a unit
    pub search_ms: u64,
    /// Fixed part of each progress step
    pub progress_base_ms: u64,
    /// Upper bound of the random part of each progress step
    pub progress_jitter_ms: u64,
    /// Delay between ETA 0 and arrival
    pub arrival_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            call_received_ms: 1500,
            search_ms: 2000,
            progress_base_ms: 2000,
            progress_jitter_ms: 2500,
            arrival_ms: 2000,
        }
    }
}

impl PacingConfig {
    /// All delays zero
    pub fn instant() -> Self {
        Self {
            call_received_ms: 0,
            search_ms: 0,
            progress_base_ms: 0,
            progress_jitter_ms: 0,
            arrival_ms: 0,
        }
    }

    pub fn call_received(&self) -> Duration {
        Duration::from_millis(self.call_received_ms)
    }

    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    /// Progress delay for a uniform draw `u` in `[0, 1)`
    pub fn progress(&self, u: f64) -> Duration {
        let jitter = (self.progress_jitter_ms as f64 * u).floor() as u64;
        Duration::from_millis(self.progress_base_ms + jitter)
    }

    pub fn arrival(&self) -> Duration {
        Duration::from_millis(self.arrival_ms)
    }
}

/// Simulator tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// A roster unit farther than this is not dispatched
    pub dispatch_radius_km: f64,
    /// ETA minutes per km of distance
    pub eta_minutes_per_km: f64,
    /// Fixed ETA minutes added to every dispatch
    pub eta_overhead_minutes: u32,
    /// Fabricate a unit when none is in range
    pub synthesize_prototypes: bool,
    /// Degrees-to-km factor used when placing prototypes
    pub km_per_degree: f64,
    /// Latitude offset of the route midpoint
    pub route_offset_lat: f64,
    /// Longitude offset of the route midpoint
    pub route_offset_lon: f64,
    pub pacing: PacingConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            dispatch_radius_km: 15.0,
            eta_minutes_per_km: 1.5,
            eta_overhead_minutes: 2,
            synthesize_prototypes: true,
            km_per_degree: 111.32,
            route_offset_lat: 0.01,
            route_offset_lon: -0.01,
            pacing: PacingConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Default tuning with zero pacing
    pub fn instant() -> Self {
        Self {
            pacing: PacingConfig::instant(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Load from a JSON file, or defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dispatch_radius_km.is_finite() || self.dispatch_radius_km < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "dispatch_radius_km must be a non-negative number, got {}",
                self.dispatch_radius_km
            )));
        }
        if !self.eta_minutes_per_km.is_finite() || self.eta_minutes_per_km < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "eta_minutes_per_km must be a non-negative number, got {}",
                self.eta_minutes_per_km
            )));
        }
        // Units are only ever dispatched from within the radius
        let worst_eta = (self.dispatch_radius_km * self.eta_minutes_per_km).floor()
            + f64::from(self.eta_overhead_minutes);
        if worst_eta > f64::from(MAX_ETA_MINUTES) {
            return Err(ConfigError::Invalid(format!(
                "ETA at the dispatch radius would be {} minutes, more than {}",
                worst_eta, MAX_ETA_MINUTES
            )));
        }
        if !self.km_per_degree.is_finite() || self.km_per_degree <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "km_per_degree must be positive, got {}",
                self.km_per_degree
            )));
        }
        if !self.route_offset_lat.is_finite() || !self.route_offset_lon.is_finite() {
            return Err(ConfigError::Invalid("route offsets must be finite".into()));
        }
        Ok(())
    }

    /// Initial ETA in whole minutes for a distance
    pub fn eta_minutes(&self, distance_km: f64) -> u32 {
        ((distance_km * self.eta_minutes_per_km).floor() as u32)
            .saturating_add(self.eta_overhead_minutes)
    }
}
