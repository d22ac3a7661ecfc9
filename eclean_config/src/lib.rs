#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and produce-table parsing for the E-Cleaning controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty document yields the stock panel.
//! - The produce CSV loader enforces headers and rejects unknown produce.
use serde::Deserialize;
use std::collections::BTreeMap;

/// Produce names accepted by the type selector, in display order.
pub const KNOWN_PRODUCE: [&str; 5] = ["Apple", "Banana", "Carrot", "Tomato", "Potato"];

/// Produce CSV schema.
///
/// Expected headers:
/// produce,seconds
///
/// Example:
/// produce,seconds
/// Tomato,30
/// Potato,90
#[derive(Debug, Deserialize, Clone)]
pub struct ProduceRow {
    pub produce: String,
    pub seconds: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PairingCfg {
    /// Name shown in the "paired" banner.
    pub device_name: String,
    /// Delay between the paired banner and opening the panel (ms).
    pub delay_ms: u64,
    /// Devices the simulated link reports as bonded.
    pub bonded: Vec<String>,
}

impl Default for PairingCfg {
    fn default() -> Self {
        Self {
            device_name: "Android_ECleanApp".to_string(),
            delay_ms: 2000,
            bonded: vec!["Android_ECleanApp".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PanelCfg {
    /// Refresh period of the "Time Now" label (ms).
    pub clock_tick_ms: u64,
    /// Number of entries retained by "View Logs".
    pub log_capacity: usize,
}

impl Default for PanelCfg {
    fn default() -> Self {
        Self {
            clock_tick_ms: 1000,
            log_capacity: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Gated transitions; emergency stop latches until reset.
    #[default]
    Strict,
    /// Every action succeeds and sets the status it names.
    Permissive,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MachineCfg {
    pub policy: Policy,
    /// UV light may only run while the conveyor runs.
    pub uv_requires_conveyor: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConveyorCfg {
    /// Belt length in meters.
    pub length_m: f32,
    /// Drive pulley radius in meters.
    pub pulley_radius_m: f32,
}

impl Default for ConveyorCfg {
    fn default() -> Self {
        Self {
            length_m: 1.82,
            pulley_radius_m: 0.05,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pairing: PairingCfg,
    pub panel: PanelCfg,
    pub machine: MachineCfg,
    pub conveyor: ConveyorCfg,
    /// Cleaning time overrides in seconds, keyed by produce name.
    pub produce_times: BTreeMap<String, u32>,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load the produce cleaning-time table from CSV.
pub fn load_produce_csv(path: &std::path::Path) -> eyre::Result<BTreeMap<String, u32>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open produce CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["produce", "seconds"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "produce CSV must have headers 'produce,seconds', got: {}",
            actual.join(",")
        );
    }

    let mut table = BTreeMap::new();
    for (idx, rec) in rdr.deserialize::<ProduceRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        check_produce_entry(&row.produce, row.seconds)
            .map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        if table.insert(row.produce.clone(), row.seconds).is_some() {
            eyre::bail!("invalid CSV row {}: duplicate produce {}", idx + 2, row.produce);
        }
    }
    Ok(table)
}

fn check_produce_entry(name: &str, seconds: u32) -> eyre::Result<()> {
    if !KNOWN_PRODUCE.contains(&name) {
        eyre::bail!(
            "unknown produce '{name}' (expected one of {})",
            KNOWN_PRODUCE.join(", ")
        );
    }
    if seconds == 0 {
        eyre::bail!("produce_times.{name} must be >= 1");
    }
    if seconds > 60 * 60 {
        eyre::bail!("produce_times.{name} is unreasonably large (>1h)");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pairing
        if self.pairing.device_name.trim().is_empty() {
            eyre::bail!("pairing.device_name must not be empty");
        }
        if self.pairing.delay_ms > 60_000 {
            eyre::bail!("pairing.delay_ms is unreasonably large (>60s)");
        }
        if self.pairing.bonded.iter().any(|d| d.trim().is_empty()) {
            eyre::bail!("pairing.bonded entries must not be empty");
        }

        // Panel
        if self.panel.clock_tick_ms == 0 {
            eyre::bail!("panel.clock_tick_ms must be >= 1");
        }
        if self.panel.log_capacity == 0 {
            eyre::bail!("panel.log_capacity must be >= 1");
        }

        // Conveyor
        if !(self.conveyor.length_m.is_finite() && self.conveyor.length_m > 0.0) {
            eyre::bail!("conveyor.length_m must be > 0");
        }
        if !(self.conveyor.pulley_radius_m.is_finite() && self.conveyor.pulley_radius_m > 0.0) {
            eyre::bail!("conveyor.pulley_radius_m must be > 0");
        }

        // Produce
        for (name, secs) in &self.produce_times {
            check_produce_entry(name, *secs)?;
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        // Machine: serde restricts policy to known values

        Ok(())
    }
}
