//! DigiPIN Command-Line Interface
//!
//! Encode and decode DigiPIN location codes, measure distances, look up
//! places, and run emergency dispatch simulations from the terminal.
//!
//! Diagnostics go to stderr (filtered by `RUST_LOG`); command output goes
//! to stdout.

mod commands;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::DispatchArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "digipin", version)]
#[command(about = "DigiPIN location codes and emergency dispatch simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a coordinate as a DigiPIN
    Encode {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Decode a DigiPIN to the center of its cell
    Decode {
        pin: String,

        /// Print the center and cell extent as JSON
        #[arg(long)]
        json: bool,
    },

    /// Great-circle distance between two coordinates in km
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// List the DigiPINs of the adjacent cells
    Neighbors { pin: String },

    /// Resolve a DigiPIN to a place and add it to the lookup history
    Place { pin: String },

    /// Show recently looked-up places
    History {
        /// Forget all looked-up places
        #[arg(long)]
        clear: bool,
    },

    /// Simulate an emergency dispatch to a coordinate
    Dispatch(DispatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "digipin=info,digipin_codec=info,digipin_places=info,digipin_dispatch=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode { lat, lon } => commands::encode(lat, lon),
        Command::Decode { pin, json } => commands::decode(&pin, json),
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance(lat1, lon1, lat2, lon2),
        Command::Neighbors { pin } => commands::neighbors(&pin),
        Command::Place { pin } => commands::place(&pin).await,
        Command::History { clear } => commands::history(clear),
        Command::Dispatch(args) => commands::dispatch(args).await,
    }
}
