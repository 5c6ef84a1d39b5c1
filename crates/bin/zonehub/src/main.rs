//! # zonehub — zone-scoped device scripts
//!
//! Composition root that wires the adapters together and runs one script.
//!
//! ## Responsibilities
//! - Parse the command line and configuration (file, env vars)
//! - Load the home snapshot into the virtual hub
//! - Open the `SQLite` key-value store and run migrations
//! - Construct the requested application service and print its result
//! - Optionally write the mutated snapshot back
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zonehub_adapter_storage_sqlite_sqlx::{Config as DatabaseConfig, SqliteKeyValueStore};
use zonehub_adapter_virtual::VirtualHome;
use zonehub_app::dispatcher::DispatchReport;
use zonehub_app::services::clock::ClockService;
use zonehub_app::services::color::ColorZoneService;
use zonehub_app::services::color_temperature::ColorTemperatureService;
use zonehub_app::services::dim::DimZoneService;
use zonehub_app::services::flow::FlowService;
use zonehub_app::services::light_status::LightStatusService;
use zonehub_app::services::non_reporting::NonReportingService;
use zonehub_app::services::presence::PresenceService;
use zonehub_app::services::random_color::RandomColorService;
use zonehub_app::services::zone_activity::{ActivityReason, ZoneActivityService};
use zonehub_domain::time::now;

use crate::config::Config;

/// Run zone-scoped scripts against a home snapshot
#[derive(Parser)]
#[command(name = "zonehub", version, about)]
struct Cli {
    /// Configuration file (defaults to `zonehub.toml` when present)
    #[arg(short, long, env = "ZONEHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Write the snapshot back after the script ran
    #[arg(long)]
    save: bool,

    #[command(subcommand)]
    command: Command,
}

/// The pipe-separated script argument, e.g. `-20|Kitchen|Hallway`.
#[derive(Args)]
struct ScriptArg {
    #[arg(allow_hyphen_values = true)]
    argument: Option<String>,
}

impl ScriptArg {
    fn as_deref(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

#[derive(Subcommand)]
enum Command {
    /// Dim lights: `level|zone|…`
    Dim(ScriptArg),
    /// Set a colour: `#RRGGBB|zone|…`
    Color(ScriptArg),
    /// Set the colour temperature: `percent|zone|…`
    ColorTemp(ScriptArg),
    /// Give eligible lights a random palette colour: `zone|…`
    RandomColor(ScriptArg),
    /// Tag devices that stopped reporting: `days|battery_days`
    NonReporting(ScriptArg),
    /// Whether any light is on
    AnyLightOn,
    /// Whether everybody at home sleeps: `min_sleepers`
    AllSleeping(ScriptArg),
    /// List active zones and why
    ZoneActivity,
    /// Disable every regular and advanced flow
    DisableFlows,
    /// Current time in the hub's time zone
    LocalTime,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let home = VirtualHome::load(&config.snapshot.path)
        .with_context(|| format!("loading snapshot {}", config.snapshot.path.display()))?;
    let db = DatabaseConfig {
        database_url: config.storage.database_url.clone(),
    }
    .build()
    .await
    .context("opening key-value store")?;
    let store = SqliteKeyValueStore::new(db.pool().clone());

    let snapshot_path = config.snapshot.path.clone();
    run(cli.command, config, &home, &store).await?;

    if cli.save {
        home.save(&snapshot_path)
            .with_context(|| format!("saving snapshot {}", snapshot_path.display()))?;
        tracing::info!(path = %snapshot_path.display(), "snapshot saved");
    }
    Ok(())
}

async fn run(
    command: Command,
    config: Config,
    home: &VirtualHome,
    store: &SqliteKeyValueStore,
) -> anyhow::Result<()> {
    match command {
        Command::Dim(arg) => {
            let outcome = DimZoneService::new(home, config.dim)
                .run(arg.as_deref())
                .await?;
            print_report("dimmed", &outcome.dimmed);
            if let Some(on) = outcome.fallback_on {
                let state = if on { "on" } else { "off" };
                print_report(&format!("switched {state}"), &outcome.fallback);
            }
        }
        Command::Color(arg) => {
            let report = ColorZoneService::new(home, config.color)
                .run(arg.as_deref())
                .await?;
            print_report("coloured", &report);
        }
        Command::ColorTemp(arg) => {
            let report = ColorTemperatureService::new(home, config.color_temperature)
                .run(arg.as_deref())
                .await?;
            print_report("set temperature", &report);
        }
        Command::RandomColor(arg) => {
            let report = RandomColorService::new(home, store, config.random_color)
                .run(arg.as_deref(), now())
                .await?;
            print_report("coloured", &report);
        }
        Command::NonReporting(arg) => {
            let report = NonReportingService::new(home, config.non_reporting)
                .run(arg.as_deref(), now())
                .await?;
            print!("{}", report.text);
            println!("{}", report.any());
        }
        Command::AnyLightOn => {
            println!("{}", LightStatusService::new(home).any_light_on().await?);
        }
        Command::AllSleeping(arg) => {
            let sleeping = PresenceService::new(home, config.presence)
                .all_sleeping(arg.as_deref())
                .await?;
            println!("{sleeping}");
        }
        Command::ZoneActivity => {
            for activity in ZoneActivityService::new(home).list().await? {
                println!("{}", activity.zone);
                for reason in activity.reasons {
                    match reason {
                        ActivityReason::Device { device, capability } => {
                            println!("  {device} | {capability}");
                        }
                        ActivityReason::Zone { zone } => println!("  {zone}"),
                    }
                }
            }
        }
        Command::DisableFlows => {
            let disabled = FlowService::new(home).disable_all().await?;
            println!("disabled {disabled} flows");
        }
        Command::LocalTime => {
            println!("{}", ClockService::new(home).local_time(now()).await?);
        }
    }
    Ok(())
}

fn print_report(verb: &str, report: &DispatchReport) {
    for issued in &report.issued {
        println!("{verb} {}", issued.device_id);
    }
    for failure in &report.failed {
        println!("failed {}", failure.device_id);
    }
    if !report.skipped.is_empty() {
        println!("skipped {} devices", report.skipped.len());
    }
}
