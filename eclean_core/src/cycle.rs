//! Timed cleaning cycle driven by the selected produce.
//!
//! The belt has to carry produce across its full length within the
//! produce's cleaning time, which fixes the drive pulley speed:
//!
//!   belt speed  v   = length_m / t            (m/s)
//!   pulley rpm      = v * 60 / (2π · r)
use crate::timer::Repeating;
use crate::types::Produce;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Cleaning time in seconds per produce, indexed like `Produce::ALL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceCatalogue {
    seconds: [u32; 5],
}

impl Default for ProduceCatalogue {
    fn default() -> Self {
        // Apple, Banana, Carrot, Tomato, Potato
        Self {
            seconds: [45, 40, 80, 30, 90],
        }
    }
}

impl ProduceCatalogue {
    /// Defaults with per-produce overrides. Unknown names are ignored; the
    /// config layer rejects them before this point.
    pub fn with_overrides(overrides: &BTreeMap<String, u32>) -> Self {
        let mut cat = Self::default();
        for (name, secs) in overrides {
            if let Ok(p) = name.parse::<Produce>() {
                cat.seconds[p.index()] = (*secs).max(1);
            }
        }
        cat
    }

    pub fn seconds(&self, p: Produce) -> u32 {
        self.seconds[p.index()]
    }
}

/// Belt geometry used for the rpm calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConveyorGeometry {
    pub length_m: f32,
    pub pulley_radius_m: f32,
}

impl Default for ConveyorGeometry {
    fn default() -> Self {
        Self {
            length_m: 1.82,
            pulley_radius_m: 0.05,
        }
    }
}

impl ConveyorGeometry {
    /// Pulley rpm that moves the belt its full length in `secs` seconds,
    /// rounded to nearest. Zero seconds is treated as one.
    pub fn rpm_for(&self, secs: u32) -> u32 {
        let t = f64::from(secs.max(1));
        let v = f64::from(self.length_m) / t;
        let rpm = (v * 60.0) / (2.0 * std::f64::consts::PI * f64::from(self.pulley_radius_m));
        if !rpm.is_finite() || rpm <= 0.0 {
            return 0;
        }
        rpm.round().min(f64::from(u32::MAX)) as u32
    }
}

/// `mm:ss` rendering used by the time-required field.
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `hh:mm:ss` rendering used for the countdown.
pub fn format_hhmmss(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTick {
    Idle,
    Counting(u32),
    Finished,
}

/// Countdown of a running automatic cycle.
#[derive(Debug, Clone)]
pub struct AutoCycle {
    produce: Produce,
    total: u32,
    remaining: u32,
    rpm: u32,
    ticker: Repeating,
}

impl AutoCycle {
    pub fn start(
        produce: Produce,
        catalogue: &ProduceCatalogue,
        geometry: &ConveyorGeometry,
        now: Instant,
    ) -> Self {
        let total = catalogue.seconds(produce);
        Self {
            produce,
            total,
            remaining: total,
            rpm: geometry.rpm_for(total),
            ticker: Repeating::new(now, Duration::from_secs(1)),
        }
    }

    pub fn produce(&self) -> Produce {
        self.produce
    }

    pub fn total_secs(&self) -> u32 {
        self.total
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    pub fn poll(&mut self, now: Instant) -> CycleTick {
        let fired = self.ticker.poll(now);
        if fired == 0 {
            return CycleTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(fired);
        if self.remaining == 0 {
            CycleTick::Finished
        } else {
            CycleTick::Counting(self.remaining)
        }
    }
}
