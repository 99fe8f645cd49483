//! # CiA 402 Scenario Simulator
//!
//! Replays a scripted control-word / AL-status sequence through one axis and
//! logs the status word, transition and flag edges of every cycle.
//!
//! The device config (`--config`) may override individual command patterns
//! for vendor variants; without it the standard CiA 402 table is used.

use clap::Parser;
use cia402_common::config::LogLevel;
use cia402_device::config::{DeviceConfig, load_config};
use cia402_device::scenario::Scenario;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// CiA 402 scenario simulator: replay control words through one axis
#[derive(Parser, Debug)]
#[command(name = "cia402_sim")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Replay a CiA 402 control-word scenario through one axis")]
struct Args {
    /// Path to the scenario TOML ([[cycle]] entries).
    scenario: PathBuf,

    /// Path to the device configuration TOML.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Config errors are reported after tracing is up.
    let config = match args.config.as_deref() {
        Some(path) => load_config(path),
        None => Ok(DeviceConfig::with_service_name("cia402_sim")),
    };
    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("CiA 402 simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|cfg| run(&args, &cfg));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("CiA 402 simulator finished");
}

fn run(args: &Args, config: &DeviceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let commands = config.command_set();
    if !config.commands.is_empty() {
        info!(
            "{}: {} command pattern(s) overridden",
            config.shared.service_name,
            config.commands.len()
        );
    }

    let scenario = Scenario::load_file(&args.scenario)?;
    info!(
        "Loaded {} cycles ({} steps) from {}",
        scenario.cycles.len(),
        scenario.step_count(),
        args.scenario.display()
    );

    let records = scenario.run(commands)?;
    for rec in &records {
        info!(
            cycle = rec.cycle,
            controlword = format_args!("{:#06x}", rec.controlword),
            al_status = format_args!("{:#06x}", rec.al_status),
            status_word = format_args!("{:#06x}", rec.status_word),
            transition = ?rec.transition,
            flags = format_args!("{:#04x}", rec.flags.pack()),
            changed = ?rec.changes,
            "{}",
            rec.state
        );
    }

    let faulted = records.iter().filter(|r| r.state.is_fault()).count();
    let last = records.last().map(|r| r.state).unwrap_or_default();
    info!(
        "{} steps replayed ({faulted} in fault), final state: {last}",
        records.len()
    );
    if last.is_powered() {
        warn!("scenario ends with high voltage applied ({last})");
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        log_level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
