//! Mapping from `eclean_config` TOML types to runtime settings.
use crate::config::{PairingSettings, PanelSettings};
use crate::cycle::{ConveyorGeometry, ProduceCatalogue};
use crate::machine::Policy;
use std::time::Duration;

impl From<eclean_config::Policy> for Policy {
    fn from(p: eclean_config::Policy) -> Self {
        match p {
            eclean_config::Policy::Strict => Policy::Strict,
            eclean_config::Policy::Permissive => Policy::Permissive,
        }
    }
}

impl From<&eclean_config::ConveyorCfg> for ConveyorGeometry {
    fn from(c: &eclean_config::ConveyorCfg) -> Self {
        Self {
            length_m: c.length_m,
            pulley_radius_m: c.pulley_radius_m,
        }
    }
}

impl From<&eclean_config::PairingCfg> for PairingSettings {
    fn from(c: &eclean_config::PairingCfg) -> Self {
        Self {
            device_name: c.device_name.clone(),
            delay: Duration::from_millis(c.delay_ms),
        }
    }
}

impl From<&eclean_config::Config> for PanelSettings {
    fn from(c: &eclean_config::Config) -> Self {
        Self {
            clock_tick: Duration::from_millis(c.panel.clock_tick_ms.max(1)),
            log_capacity: c.panel.log_capacity.max(1),
            log_file: None,
            policy: c.machine.policy.into(),
            uv_requires_conveyor: c.machine.uv_requires_conveyor,
            geometry: (&c.conveyor).into(),
            catalogue: ProduceCatalogue::with_overrides(&c.produce_times),
        }
    }
}
