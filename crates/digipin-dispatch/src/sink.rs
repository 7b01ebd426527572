//! Incident sink collaborator
//!
//! The simulator hands each incident to an [`IncidentSink`] before the run
//! starts. Storage is the sink's business; the simulator only reports the
//! outcome in the run log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use digipin_codec::GeoCoordinate;
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::units::EmergencyType;

/// An incident as handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub requester_id: String,
    pub emergency: EmergencyType,
    pub location: GeoCoordinate,
    /// DigiPIN of the incident cell
    pub digipin: String,
}

/// Persists incidents on behalf of a requester
#[async_trait]
pub trait IncidentSink: Send + Sync {
    async fn record(&self, incident: &IncidentRecord) -> Result<(), SinkError>;
}

/// Sink that accepts and discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl IncidentSink for NoopSink {
    async fn record(&self, _incident: &IncidentRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory sink; can be switched to fail. Records without a requester are rejected.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<IncidentRecord>>,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every record
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<IncidentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IncidentSink for MemorySink {
    async fn record(&self, incident: &IncidentRecord) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("memory sink set to fail".into()));
        }
        if incident.requester_id.trim().is_empty() {
            return Err(SinkError::Rejected("blank requester id".into()));
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(incident.clone());
        Ok(())
    }
}
