//! Runtime settings for the pairing screen and device panel.
//!
//! These are separate from the TOML-deserialized config in `eclean_config`;
//! see `conversions` for the mapping.
use crate::cycle::{ConveyorGeometry, ProduceCatalogue};
use crate::machine::Policy;
use std::path::PathBuf;
use std::time::Duration;

/// Device name shown in the paired banner when none is configured.
pub const DEFAULT_DEVICE_NAME: &str = "Android_ECleanApp";

#[derive(Debug, Clone)]
pub struct PairingSettings {
    pub device_name: String,
    /// Delay between the paired banner and the panel opening.
    pub delay: Duration,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub clock_tick: Duration,
    pub log_capacity: usize,
    /// Optional append-only file for the event log.
    pub log_file: Option<PathBuf>,
    pub policy: Policy,
    pub uv_requires_conveyor: bool,
    pub geometry: ConveyorGeometry,
    pub catalogue: ProduceCatalogue,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            clock_tick: Duration::from_millis(1000),
            log_capacity: 200,
            log_file: None,
            policy: Policy::Strict,
            uv_requires_conveyor: false,
            geometry: ConveyorGeometry::default(),
            catalogue: ProduceCatalogue::default(),
        }
    }
}
