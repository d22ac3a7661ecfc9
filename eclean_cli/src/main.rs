#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod command;
mod error_fmt;
mod logging;
mod session;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE, json_mode};
use eclean_config::Config;
use eclean_core::panel::SharedClock;
use eclean_core::{App, EcleanError, PairingSettings, PanelSettings, Produce};
use eclean_hardware::{FaultSwitch, SimulatedConveyor, SimulatedLink, SimulatedUvLamp};
use eclean_traits::{Lamp, Link, Motor, MonotonicClock};
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use eyre::WrapErr;
use serde_json::json;
use session::{Printer, Session};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            if json_mode() {
                eprintln!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            exit_code_for_error(&e)
        }
    };
    std::process::exit(code);
}

fn config_error(e: &eyre::Report) -> EcleanError {
    EcleanError::Config(format!("{e:#}"))
}

fn load_config(path: Option<&Path>, produce_csv: Option<&Path>) -> eyre::Result<Config> {
    let mut cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .wrap_err_with(|| format!("read config {}", p.display()))
                .map_err(|e| config_error(&e))?;
            eclean_config::load_toml(&text)
                .wrap_err("parse config TOML")
                .map_err(|e| config_error(&e))?
        }
        None => Config::default(),
    };
    if let Some(csv) = produce_csv {
        let table = eclean_config::load_produce_csv(csv).map_err(|e| config_error(&e))?;
        cfg.produce_times.extend(table);
    }
    cfg.validate().map_err(|e| config_error(&e))?;
    Ok(cfg)
}

/// Simulated devices to fail, from `ECLEAN_SIM_FAULT` (comma-separated
/// `conveyor`, `uv`, `link`).
struct SimFaults {
    conveyor: FaultSwitch,
    uv: FaultSwitch,
    link: FaultSwitch,
}

impl SimFaults {
    fn from_env() -> Self {
        let f = Self {
            conveyor: FaultSwitch::new(),
            uv: FaultSwitch::new(),
            link: FaultSwitch::new(),
        };
        let list = std::env::var("ECLEAN_SIM_FAULT").unwrap_or_default();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name {
                "conveyor" => f.conveyor.trip(),
                "uv" => f.uv.trip(),
                "link" => f.link.trip(),
                other => tracing::warn!(device = other, "unknown simulated fault ignored"),
            }
        }
        f
    }
}

fn sim_hardware(
    cfg: &Config,
    faults: &SimFaults,
) -> (SimulatedConveyor, SimulatedUvLamp, SimulatedLink) {
    (
        SimulatedConveyor::with_fault(faults.conveyor.clone()),
        SimulatedUvLamp::with_fault(faults.uv.clone()),
        SimulatedLink::new(cfg.pairing.bonded.clone()).with_fault(faults.link.clone()),
    )
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref(), cli.produce_csv.as_deref())?;
    logging::init_tracing(cli.json, &cli.log_level, &cfg.logging)?;
    tracing::debug!(policy = ?cfg.machine.policy, "config loaded");

    match cli.cmd {
        Commands::Run { script, event_log } => run_session(&cfg, script.as_deref(), event_log),
        Commands::Produce => list_produce(&cfg),
        Commands::SelfCheck => self_check(&cfg),
    }
}

fn run_session(
    cfg: &Config,
    script: Option<&Path>,
    event_log: Option<std::path::PathBuf>,
) -> eyre::Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "ctrl-c handler not installed");
        }
    }

    let input: Box<dyn BufRead + Send> = match script {
        Some(p) => Box::new(BufReader::new(
            std::fs::File::open(p).wrap_err_with(|| format!("open script {}", p.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut panel = PanelSettings::from(cfg);
    panel.log_file = event_log;
    let pairing = PairingSettings::from(&cfg.pairing);
    let clock: SharedClock = Arc::new(MonotonicClock::new());
    let faults = SimFaults::from_env();
    let (conveyor, lamp, link) = sim_hardware(cfg, &faults);

    let app = App::new(conveyor, lamp, link, pairing, panel.clone(), clock.clone());
    let printer = Printer::new(std::io::stdout().lock(), json_mode());
    Session::new(app, panel, clock, printer, shutdown).run(input)
}

fn list_produce(cfg: &Config) -> eyre::Result<()> {
    let settings = PanelSettings::from(cfg);
    if json_mode() {
        for p in Produce::ALL {
            let secs = settings.catalogue.seconds(p);
            println!(
                "{}",
                json!({ "produce": p.name(), "seconds": secs, "rpm": settings.geometry.rpm_for(secs) })
            );
        }
    } else {
        print!("{}", eclean_ui::render_settings(&settings));
    }
    Ok(())
}

/// Exercise every simulated device once.
fn self_check(cfg: &Config) -> eyre::Result<()> {
    let faults = SimFaults::from_env();
    let (mut conveyor, mut lamp, mut link) = sim_hardware(cfg, &faults);
    let not_responding = |e: Box<dyn std::error::Error + Send + Sync>| {
        EcleanError::DeviceNotResponding(e.to_string())
    };

    conveyor.start().map_err(not_responding)?;
    conveyor.stop().map_err(not_responding)?;
    lamp.on().map_err(not_responding)?;
    lamp.off().map_err(not_responding)?;
    let device = cfg.pairing.device_name.as_str();
    if link.bonded_devices().iter().any(|d| d == device) {
        if !link.connect(device).map_err(not_responding)? {
            return Err(EcleanError::PairingRefused(device.to_string()).into());
        }
        link.disconnect().map_err(not_responding)?;
    }

    if json_mode() {
        println!("{}", json!({ "status": "ok" }));
    } else {
        println!("ok");
    }
    Ok(())
}
