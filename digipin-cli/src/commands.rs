//! Subcommand implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use digipin_codec::{distance_km, DigiPin, GeoCoordinate, PinError};
use digipin_dispatch::{
    DispatchRequest, DispatchSimulator, DispatchState, EmergencyType, InstantClock, LogEntry,
    LogLevel, PacingConfig, Roster, UnitStatus,
};
use digipin_places::{OfflineProvider, PlaceError, PlaceService};
use serde::Serialize;
use tracing::{info, warn};

use crate::settings;

/// Arguments for `digipin dispatch`
#[derive(Debug, Args)]
pub struct DispatchArgs {
    /// Incident latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Incident longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Emergency type: ambulance, firefighter or police
    #[arg(long = "type", value_name = "TYPE")]
    pub emergency: EmergencyType,

    /// Account to log the incident against
    #[arg(long)]
    pub requester: Option<String>,

    /// Skip the real-time pacing between steps
    #[arg(long)]
    pub instant: bool,

    /// Print each patch as a JSON line instead of the narrative
    #[arg(long)]
    pub json: bool,

    /// Dispatch config file (default: $XDG_CONFIG_HOME/digipin/dispatch.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unit roster JSON file (default: built-in roster)
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Fixed timestamp on every log line, for reproducible output
    #[arg(long, requires = "instant")]
    pub fixed_time: Option<String>,
}

#[derive(Serialize)]
struct DecodedPin {
    pin: String,
    lat: f64,
    lon: f64,
    cell: CellExtent,
}

#[derive(Serialize)]
struct CellExtent {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

pub fn encode(lat: f64, lon: f64) -> Result<()> {
    let coord = GeoCoordinate::new(lat, lon).context("Invalid coordinate")?;
    println!("{}", DigiPin::from_coordinate(&coord));
    Ok(())
}

pub fn decode(text: &str, json: bool) -> Result<()> {
    let pin = parse_pin(text)?;
    let center = pin.coordinate();

    if json {
        let cell = pin.cell();
        let out = DecodedPin {
            pin: pin.to_string(),
            lat: center.latitude(),
            lon: center.longitude(),
            cell: CellExtent {
                min_lat: cell.min_lat,
                max_lat: cell.max_lat,
                min_lon: cell.min_lon,
                max_lon: cell.max_lon,
            },
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", center);
    }
    Ok(())
}

pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<()> {
    let a = GeoCoordinate::new(lat1, lon1).context("Invalid first coordinate")?;
    let b = GeoCoordinate::new(lat2, lon2).context("Invalid second coordinate")?;
    println!("{:.3} km", distance_km(&a, &b));
    Ok(())
}

pub fn neighbors(text: &str) -> Result<()> {
    let pin = parse_pin(text)?;
    for (direction, adjacent) in pin.neighbors() {
        println!("{:<10} {}", format!("{:?}", direction), adjacent);
    }
    Ok(())
}

pub async fn place(text: &str) -> Result<()> {
    let service = PlaceService::new(OfflineProvider);
    let place = match service.place_for_pin(text).await {
        Ok(place) => place,
        Err(PlaceError::Pin(e)) => return Err(pin_error(e)),
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&place)?);

    let mut history = settings::load_history();
    history.push(place);
    if let Err(e) = settings::save_history(&history) {
        warn!("Could not save lookup history: {:#}", e);
    }
    Ok(())
}

pub fn history(clear: bool) -> Result<()> {
    let mut history = settings::load_history();
    if clear {
        history.clear();
        settings::save_history(&history)?;
        info!("Lookup history cleared");
        return Ok(());
    }

    if history.is_empty() {
        println!("No places looked up yet");
    }
    for place in history.entries() {
        println!("{}  {}", place.digi_pin, place.display_name);
    }
    Ok(())
}

pub async fn dispatch(args: DispatchArgs) -> Result<()> {
    let incident = GeoCoordinate::new(args.lat, args.lon).context("Invalid incident coordinate")?;

    let mut config = settings::load_dispatch_config(args.config.as_deref())?;
    if args.instant {
        config.pacing = PacingConfig::instant();
    }

    let roster = match &args.roster {
        Some(path) => Roster::load(path)
            .with_context(|| format!("Failed to load roster {}", path.display()))?,
        None => Roster::india_default(),
    };
    info!("Loaded roster with {} units", roster.len());

    let mut simulator = DispatchSimulator::new(roster, config);
    if let Some(label) = &args.fixed_time {
        simulator = simulator.with_clock(Arc::new(InstantClock::with_label(label.clone())));
    }

    let mut request = DispatchRequest::new(incident, args.emergency);
    if let Some(requester) = &args.requester {
        request = request.with_requester(requester.clone());
    }

    let mut run = simulator.start(request);
    let mut state = DispatchState::default();
    let mut printed = 0;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        let next = tokio::select! {
            patch = run.next_patch() => Some(patch),
            _ = &mut interrupt => None,
        };
        let Some(next) = next else {
            warn!("Interrupted, cancelling dispatch run {}", run.id());
            run.cancel().await;
            bail!("dispatch cancelled");
        };
        let Some(patch) = next else {
            break;
        };

        if args.json {
            println!("{}", serde_json::to_string(&patch)?);
        }
        state.apply(patch);
        if !args.json {
            for entry in &state.logs[printed..] {
                print_entry(entry);
            }
        }
        printed = state.logs.len();
    }

    if state.is_failed() {
        bail!("no unit could be dispatched to {}", incident);
    }
    if let (Some(UnitStatus::OnScene), Some(unit)) = (state.status, &state.unit) {
        info!("Unit {} on scene at {}", unit.id, incident);
    }
    Ok(())
}

fn print_entry(entry: &LogEntry) {
    let level = match entry.level {
        LogLevel::Info => "INFO",
        LogLevel::Route => "ROUTE",
        LogLevel::Success => "OK",
        LogLevel::Warning => "WARN",
    };
    println!("[{}] {:<5} {}", entry.timestamp, level, entry.message);
}

fn parse_pin(text: &str) -> Result<DigiPin> {
    DigiPin::parse(text).map_err(pin_error)
}

/// Give checksum typos their own message
fn pin_error(e: PinError) -> anyhow::Error {
    match e {
        PinError::ChecksumMismatch { expected, actual } => anyhow!(
            "DigiPIN checksum does not match: it ends in '{}' but should end in '{}'. Check the code for a typo",
            actual,
            expected
        ),
        other => anyhow::Error::new(other).context("Not a valid DigiPIN"),
    }
}
