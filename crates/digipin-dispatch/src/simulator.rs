//! Dispatch simulator and per-run handles
//!
//! [`DispatchSimulator`] holds the read-only roster and configuration plus
//! the injected clock, random source and incident sink. Each call to
//! [`DispatchSimulator::start`] spawns an independent producer task and
//! returns a [`DispatchRun`] that receives its patches.
//!
//! The producer advances one step at a time: it emits a patch, then waits
//! on the clock before the next step. Dropping or cancelling the run aborts
//! the task, which abandons whatever delay it is waiting on.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use digipin_codec::coordinate::{MAX_LAT, MIN_LAT};
use digipin_codec::{distance_km, to_pin, GeoCoordinate};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::DispatchConfig;
use crate::random::{RandomSource, ThreadRandom};
use crate::sink::{IncidentRecord, IncidentSink, NoopSink};
use crate::state::{DispatchPatch, DispatchState, LogEntry, LogLevel, UnitStatus};
use crate::units::{EmergencyType, EmergencyUnit, Roster};

/// Patches buffered between producer and consumer
const PATCH_BUFFER: usize = 16;

/// Identifier given to fabricated units
pub const PROTOTYPE_UNIT_ID: &str = "PROTO-1";

/// Station label given to fabricated units
pub const PROTOTYPE_STATION: &str = "Prototype Local Response Unit";

/// What a caller asks to be dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub incident: GeoCoordinate,
    pub emergency: EmergencyType,
    /// Account to log the incident against, if signed in
    pub requester: Option<String>,
}

impl DispatchRequest {
    pub fn new(incident: GeoCoordinate, emergency: EmergencyType) -> Self {
        Self {
            incident,
            emergency,
            requester: None,
        }
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }
}

/// Starts independent dispatch runs
///
/// Holds no per-run state; any number of runs may be active at once.
pub struct DispatchSimulator {
    roster: Arc<Roster>,
    config: DispatchConfig,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    sink: Arc<dyn IncidentSink>,
    next_run: AtomicU64,
}

impl DispatchSimulator {
    /// Real-time simulator with a thread RNG and no incident persistence
    pub fn new(roster: Roster, config: DispatchConfig) -> Self {
        Self {
            roster: Arc::new(roster),
            config,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandom),
            sink: Arc::new(NoopSink),
            next_run: AtomicU64::new(1),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn IncidentSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Spawn a run on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self, request: DispatchRequest) -> DispatchRun {
        let id = self.next_run.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(PATCH_BUFFER);

        info!(
            "Starting dispatch run {}: {} at {}",
            id,
            request.emergency.name(),
            request.incident
        );

        let task = RunTask {
            id,
            roster: self.roster.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            random: self.random.clone(),
            sink: self.sink.clone(),
            request,
            logs: Vec::new(),
            tx,
        };
        let handle = tokio::spawn(task.run().instrument(info_span!("dispatch", run = id)));

        DispatchRun {
            id,
            rx,
            task: handle,
            cancelled: false,
        }
    }
}

/// Consumer side of one run
///
/// Dropping the handle stops the run.
pub struct DispatchRun {
    id: u64,
    rx: mpsc::Receiver<DispatchPatch>,
    task: JoinHandle<()>,
    cancelled: bool,
}

impl DispatchRun {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next patch, or `None` once the run has ended or been cancelled
    pub async fn next_patch(&mut self) -> Option<DispatchPatch> {
        if self.cancelled {
            return None;
        }
        self.rx.recv().await
    }

    /// Stop the run and discard any patches not yet received
    ///
    /// Once this returns the producer no longer exists, so no timer it
    /// started is still pending.
    pub async fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.task.abort();
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                warn!("Dispatch run {} task failed: {}", self.id, e);
            }
        }
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
        debug!("Dispatch run {} cancelled", self.id);
    }

    /// Drive the run to its end and return the merged state
    pub async fn collect(mut self) -> DispatchState {
        let mut state = DispatchState::default();
        while let Some(patch) = self.next_patch().await {
            state.apply(patch);
        }
        state
    }

    /// The producer has stopped
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DispatchRun {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The consumer went away
struct Disconnected;

/// Producer side of one run
struct RunTask {
    id: u64,
    roster: Arc<Roster>,
    config: DispatchConfig,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    sink: Arc<dyn IncidentSink>,
    request: DispatchRequest,
    logs: Vec<LogEntry>,
    tx: mpsc::Sender<DispatchPatch>,
}

impl RunTask {
    async fn run(mut self) {
        match self.drive().await {
            Ok(()) => info!("Dispatch run {} ended", self.id),
            Err(Disconnected) => debug!("Dispatch run {} consumer went away", self.id),
        }
    }

    async fn drive(&mut self) -> Result<(), Disconnected> {
        self.record_incident().await;

        let emergency = self.request.emergency;
        self.log(format!("CALL RECEIVED: {} Request", emergency.name()), LogLevel::Warning);
        self.emit(DispatchPatch::logs(&self.logs)).await?;

        self.clock.sleep(self.config.pacing.call_received()).await;
        self.log("Searching for nearest unit...", LogLevel::Info);
        self.emit(DispatchPatch::logs(&self.logs).with_status(Some(UnitStatus::Dispatching)))
            .await?;

        self.clock.sleep(self.config.pacing.search()).await;
        let Some((unit, distance)) = self.select_unit() else {
            return self.fail().await;
        };

        let mut eta = self.config.eta_minutes(distance);
        info!(
            "Dispatching {} from {} ({:.2} km, ETA {} min)",
            unit.id, unit.station, distance, eta
        );
        self.log(
            format!(
                "UNIT {} ({}) from {} DISPATCHED. DISTANCE: {:.2} km. INITIAL ETA: {} MIN.",
                unit.id, unit.category, unit.station, distance, eta
            ),
            LogLevel::Info,
        );
        let route = self.route(&unit);
        self.emit(DispatchPatch {
            unit: Some(Some(unit)),
            eta: Some(Some(eta)),
            route: Some(route),
            logs: Some(self.logs.clone()),
            status: Some(Some(UnitStatus::EnRoute)),
            distance_km: Some(distance),
        })
        .await?;

        while eta > 0 {
            let delay = self.config.pacing.progress(self.random.next_unit());
            self.clock.sleep(delay).await;

            let step = ((self.random.next_unit() * 2.0).floor() as u32).min(1) + 1;
            eta = eta.saturating_sub(step);
            debug!("Dispatch run {} ETA now {} min", self.id, eta);
            if eta > 0 {
                self.log(format!("Unit progressing, new ETA: {} min.", eta), LogLevel::Info);
            }
            self.emit(DispatchPatch::logs(&self.logs).with_eta(eta)).await?;
        }

        self.clock.sleep(self.config.pacing.arrival()).await;
        self.log("UNIT HAS ARRIVED. STATUS: ON SCENE.", LogLevel::Success);
        self.emit(
            DispatchPatch::logs(&self.logs)
                .with_eta(0)
                .with_status(Some(UnitStatus::OnScene)),
        )
        .await
    }

    /// Hand the incident to the sink; never fails the run
    async fn record_incident(&mut self) {
        let Some(requester) = self.request.requester.clone() else {
            self.log(
                "User not logged in, incident will not be saved to account.",
                LogLevel::Info,
            );
            return;
        };

        let record = IncidentRecord {
            requester_id: requester,
            emergency: self.request.emergency,
            location: self.request.incident,
            digipin: to_pin(&self.request.incident),
        };
        match self.sink.record(&record).await {
            Ok(()) => {
                debug!("Incident {} logged for {}", record.digipin, record.requester_id);
                self.log("Incident logged to your account.", LogLevel::Info);
            }
            Err(e) => {
                warn!("Failed to log incident for {}: {}", record.requester_id, e);
                self.log(
                    "Could not log incident. Continuing with dispatch.",
                    LogLevel::Warning,
                );
            }
        }
    }

    /// Nearest roster unit in range, else a prototype if allowed
    fn select_unit(&mut self) -> Option<(EmergencyUnit, f64)> {
        let incident = self.request.incident;
        let category = self.request.emergency.unit_category();

        let nearest = self
            .roster
            .of_category(category)
            .map(|unit| (unit, distance_km(&incident, &unit.location)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(unit, distance)| (unit.clone(), distance));

        if let Some((unit, distance)) = nearest {
            debug!("Nearest {} is {} at {:.2} km", category, unit.id, distance);
            if distance <= self.config.dispatch_radius_km {
                self.log(
                    "Local unit found within dispatch radius. Dispatching now.",
                    LogLevel::Success,
                );
                return Some((unit, distance));
            }
        }

        if !self.config.synthesize_prototypes {
            warn!(
                "No {} within {} km and synthesis disabled",
                category, self.config.dispatch_radius_km
            );
            return None;
        }

        self.log(
            "No registered units nearby. Generating a prototype local response unit...",
            LogLevel::Warning,
        );
        let unit = self.synthesize_prototype()?;
        let distance = distance_km(&incident, &unit.location);
        info!("Synthesized prototype {} at {} ({:.2} km)", unit.id, unit.location, distance);
        Some((unit, distance))
    }

    /// Area-uniform random point within the dispatch radius of the incident
    fn synthesize_prototype(&self) -> Option<EmergencyUnit> {
        let incident = self.request.incident;
        let radius_deg = self.config.dispatch_radius_km / self.config.km_per_degree;

        let r = radius_deg * self.random.next_unit().sqrt();
        let theta = self.random.next_unit() * 2.0 * PI;

        let lat = (incident.latitude() + r * theta.sin()).clamp(MIN_LAT, MAX_LAT);
        let lon = wrap_longitude(
            incident.longitude() + r * theta.cos() / incident.latitude().to_radians().cos(),
        );

        match GeoCoordinate::new(lat, lon) {
            Ok(location) => Some(EmergencyUnit::new(
                PROTOTYPE_UNIT_ID,
                self.request.emergency.unit_category(),
                location,
                PROTOTYPE_STATION,
            )),
            Err(e) => {
                warn!("Could not place prototype unit: {}", e);
                None
            }
        }
    }

    /// Unit, offset midpoint, incident
    fn route(&self, unit: &EmergencyUnit) -> Vec<GeoCoordinate> {
        let incident = self.request.incident;
        let mid_lat = ((unit.location.latitude() + incident.latitude()) / 2.0
            + self.config.route_offset_lat)
            .clamp(MIN_LAT, MAX_LAT);
        let mid_lon = wrap_longitude(
            (unit.location.longitude() + incident.longitude()) / 2.0 + self.config.route_offset_lon,
        );
        let midpoint = GeoCoordinate::new(mid_lat, mid_lon).unwrap_or(incident);
        vec![unit.location, midpoint, incident]
    }

    async fn fail(&mut self) -> Result<(), Disconnected> {
        warn!("Dispatch run {} found no unit", self.id);
        self.log("CRITICAL ERROR: Could not dispatch any unit.", LogLevel::Warning);
        self.log(
            "Please try contacting emergency services through other means immediately.",
            LogLevel::Warning,
        );
        self.log(
            "SEARCH COMPLETE: no units available within the dispatch radius.",
            LogLevel::Warning,
        );
        let mut patch = DispatchPatch::logs(&self.logs).with_status(None);
        patch.unit = Some(None);
        self.emit(patch).await
    }

    fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        self.logs.push(LogEntry::new(self.clock.timestamp(), message, level));
    }

    async fn emit(&self, patch: DispatchPatch) -> Result<(), Disconnected> {
        self.tx.send(patch).await.map_err(|_| Disconnected)
    }
}

/// Wrap a longitude into `[-180, 180)`
fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
