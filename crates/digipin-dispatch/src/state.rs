//! Dispatch state and the patches that build it
//!
//! A run starts from [`DispatchState::default`] and emits [`DispatchPatch`]es.
//! Each patch is shallow-merged onto the previous state: a field that is
//! present replaces the old value, an absent field leaves it alone. The
//! `logs` field of a patch always carries the full log to date.

use std::fmt;

use digipin_codec::GeoCoordinate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::units::EmergencyUnit;

/// Log line that marks a run which ended without any unit
pub const FAILURE_MARKER: &str = "SEARCH COMPLETE";

/// Status of the dispatched unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    Dispatching,
    #[serde(rename = "En Route")]
    EnRoute,
    /// Reserved for consumers; no transition produces it yet
    Rerouting,
    #[serde(rename = "On Scene")]
    OnScene,
}

impl UnitStatus {
    pub fn name(&self) -> &'static str {
        match self {
            UnitStatus::Dispatching => "Dispatching",
            UnitStatus::EnRoute => "En Route",
            UnitStatus::Rerouting => "Rerouting",
            UnitStatus::OnScene => "On Scene",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of a narrative log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Route,
    Success,
    Warning,
}

/// One line of the dispatch narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of day, e.g. `14:03:27`
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
            level,
        }
    }
}

/// Accumulated view of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchState {
    pub unit: Option<EmergencyUnit>,
    /// Whole minutes; never increases once set
    pub eta: Option<u32>,
    pub route: Vec<GeoCoordinate>,
    pub logs: Vec<LogEntry>,
    pub status: Option<UnitStatus>,
    #[serde(rename = "distance")]
    pub distance_km: Option<f64>,
}

impl DispatchState {
    /// Shallow-merge a patch onto this state
    pub fn apply(&mut self, patch: DispatchPatch) {
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(eta) = patch.eta {
            self.eta = eta;
        }
        if let Some(route) = patch.route {
            self.route = route;
        }
        if let Some(logs) = patch.logs {
            self.logs = logs;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(distance) = patch.distance_km {
            self.distance_km = Some(distance);
        }
    }

    /// Run ended without a unit
    pub fn is_failed(&self) -> bool {
        self.status.is_none() && self.logs.iter().any(|l| l.message.contains(FAILURE_MARKER))
    }

    /// Run reached a state it will not leave
    pub fn is_terminal(&self) -> bool {
        self.status == Some(UnitStatus::OnScene) || self.is_failed()
    }
}

/// A partial update to a [`DispatchState`]
///
/// Outer `None` means "unchanged"; `Some(None)` explicitly clears a
/// nullable field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchPatch {
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<Option<EmergencyUnit>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub eta: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Vec<GeoCoordinate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogEntry>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<UnitStatus>>,
    #[serde(default, rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Keeps an explicit `null` distinct from a missing field
fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl DispatchPatch {
    /// Patch carrying only the log so far
    pub fn logs(logs: &[LogEntry]) -> Self {
        Self {
            logs: Some(logs.to_vec()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Option<UnitStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_eta(mut self, eta: u32) -> Self {
        self.eta = Some(Some(eta));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry::new("12:00:00", message, LogLevel::Info)
    }

    #[test]
    fn test_default_is_empty() {
        let state = DispatchState::default();
        assert!(state.unit.is_none());
        assert!(state.eta.is_none());
        assert!(state.route.is_empty());
        assert!(state.logs.is_empty());
        assert!(state.status.is_none());
        assert!(state.distance_km.is_none());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_apply_merges_only_present_fields() {
        let mut state = DispatchState::default();
        state.apply(DispatchPatch::logs(&[entry("a")]).with_status(Some(UnitStatus::Dispatching)));
        state.apply(DispatchPatch::default().with_eta(7));

        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.status, Some(UnitStatus::Dispatching));
        assert_eq!(state.eta, Some(7));
    }

    #[test]
    fn test_logs_patch_replaces_whole_log() {
        let mut state = DispatchState::default();
        state.apply(DispatchPatch::logs(&[entry("a")]));
        state.apply(DispatchPatch::logs(&[entry("a"), entry("b")]));
        assert_eq!(state.logs.len(), 2);
    }

    #[test]
    fn test_explicit_null_clears() {
        let mut state = DispatchState {
            status: Some(UnitStatus::Dispatching),
            ..Default::default()
        };
        state.apply(DispatchPatch::logs(&[entry("SEARCH COMPLETE: nothing")]).with_status(None));

        assert_eq!(state.status, None);
        assert!(state.is_failed());
        assert!(state.is_terminal());
    }

    #[test]
    fn test_null_status_without_marker_is_not_failed() {
        let mut state = DispatchState::default();
        state.apply(DispatchPatch::logs(&[entry("CALL RECEIVED")]));
        assert!(!state.is_failed());
    }

    #[test]
    fn test_patch_json_omits_unchanged_fields() {
        let patch = DispatchPatch::default().with_eta(3).with_status(None);
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["eta"], 3);
        assert!(json["status"].is_null());
        assert!(json.get("status").is_some());
        assert!(json.get("unit").is_none());
        assert!(json.get("logs").is_none());
    }

    #[test]
    fn test_patch_json_keeps_explicit_null() {
        let patch: DispatchPatch = serde_json::from_str(r#"{"status": null, "eta": 4}"#).unwrap();
        assert_eq!(patch.status, Some(None));
        assert_eq!(patch.eta, Some(Some(4)));
        assert_eq!(patch.unit, None);
    }

    #[test]
    fn test_patch_route_rejects_impossible_coordinates() {
        let json = r#"{"route": [{"latitude": 91.0, "longitude": 0.0}]}"#;
        assert!(serde_json::from_str::<DispatchPatch>(json).is_err());

        let json = r#"{"route": [{"latitude": 28.6, "longitude": 77.2}]}"#;
        let patch: DispatchPatch = serde_json::from_str(json).unwrap();
        assert_eq!(patch.route.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(serde_json::to_value(UnitStatus::EnRoute).unwrap(), "En Route");
        assert_eq!(UnitStatus::OnScene.to_string(), "On Scene");
    }
}
