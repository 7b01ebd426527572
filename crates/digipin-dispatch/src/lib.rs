//! DigiPIN Dispatch Library
//!
//! Emergency-dispatch simulation: given an incident coordinate and an
//! emergency type, pick the nearest roster unit in range (or fabricate a
//! prototype one) and stream [`DispatchPatch`]es until the unit is on scene.
//!
//! Time, randomness and incident persistence are injected through
//! [`Clock`], [`RandomSource`] and [`IncidentSink`], so runs can be paced in
//! real time in production and run instantly and deterministically in tests.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use digipin_codec::GeoCoordinate;
//! use digipin_dispatch::{
//!     DispatchConfig, DispatchRequest, DispatchSimulator, EmergencyType, InstantClock, Roster,
//!     UnitStatus,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let simulator = DispatchSimulator::new(Roster::india_default(), DispatchConfig::instant())
//!     .with_clock(Arc::new(InstantClock::new()));
//!
//! let incident = GeoCoordinate::new(28.6139, 77.2090).unwrap();
//! let state = simulator
//!     .start(DispatchRequest::new(incident, EmergencyType::Police))
//!     .collect()
//!     .await;
//!
//! assert_eq!(state.status, Some(UnitStatus::OnScene));
//! assert_eq!(state.eta, Some(0));
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod random;
pub mod simulator;
pub mod sink;
pub mod state;
pub mod units;

pub use clock::{Clock, InstantClock, ManualClock, SystemClock};
pub use config::{DispatchConfig, PacingConfig, MAX_ETA_MINUTES};
pub use error::{ConfigError, DispatchError, SinkError};
pub use random::{RandomSource, ScriptedRandom, ThreadRandom};
pub use simulator::{
    DispatchRequest, DispatchRun, DispatchSimulator, PROTOTYPE_STATION, PROTOTYPE_UNIT_ID,
};
pub use sink::{IncidentRecord, IncidentSink, MemorySink, NoopSink};
pub use state::{DispatchPatch, DispatchState, LogEntry, LogLevel, UnitStatus, FAILURE_MARKER};
pub use units::{EmergencyType, EmergencyUnit, Roster, UnitCategory};
