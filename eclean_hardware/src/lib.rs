//! Simulated device backends.
//!
//! Nothing here touches a radio or a GPIO line. Each simulator records what
//! it was asked to do and can be made to fail through a shared `FaultSwitch`,
//! which is how the controller's "device not responding" path is exercised.
pub mod error;

use eclean_traits::{DeviceResult, Lamp, Link, Motor};
use error::SimError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Shared flag that makes a simulator fail every call while tripped.
#[derive(Debug, Clone, Default)]
pub struct FaultSwitch(Arc<AtomicBool>);

impl FaultSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self, what: &'static str) -> error::Result<()> {
        if self.is_tripped() {
            return Err(SimError::NotResponding(what));
        }
        Ok(())
    }
}

/// Observable state of a simulated actuator, shared with test code.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    running: Arc<AtomicBool>,
    rpm: Arc<AtomicU32>,
}

impl Probe {
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn rpm(&self) -> u32 {
        self.rpm.load(Ordering::Relaxed)
    }
}

/// Simulated conveyor drive.
#[derive(Debug, Default)]
pub struct SimulatedConveyor {
    probe: Probe,
    fault: FaultSwitch,
}

impl SimulatedConveyor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(fault: FaultSwitch) -> Self {
        Self {
            probe: Probe::default(),
            fault,
        }
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

impl Motor for SimulatedConveyor {
    fn set_speed(&mut self, rpm: u32) -> DeviceResult<()> {
        self.fault.check("conveyor")?;
        self.probe.rpm.store(rpm, Ordering::Relaxed);
        tracing::debug!(rpm, "conveyor speed set (simulated)");
        Ok(())
    }

    fn start(&mut self) -> DeviceResult<()> {
        self.fault.check("conveyor")?;
        self.probe.running.store(true, Ordering::Relaxed);
        tracing::debug!("conveyor started (simulated)");
        Ok(())
    }

    fn stop(&mut self) -> DeviceResult<()> {
        self.fault.check("conveyor")?;
        self.probe.running.store(false, Ordering::Relaxed);
        tracing::debug!("conveyor stopped (simulated)");
        Ok(())
    }
}

/// Simulated UV light bank.
#[derive(Debug, Default)]
pub struct SimulatedUvLamp {
    probe: Probe,
    fault: FaultSwitch,
}

impl SimulatedUvLamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(fault: FaultSwitch) -> Self {
        Self {
            probe: Probe::default(),
            fault,
        }
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

impl Lamp for SimulatedUvLamp {
    fn on(&mut self) -> DeviceResult<()> {
        self.fault.check("uv light")?;
        self.probe.running.store(true, Ordering::Relaxed);
        tracing::debug!("uv light on (simulated)");
        Ok(())
    }

    fn off(&mut self) -> DeviceResult<()> {
        self.fault.check("uv light")?;
        self.probe.running.store(false, Ordering::Relaxed);
        tracing::debug!("uv light off (simulated)");
        Ok(())
    }
}

/// Simulated Bluetooth link with a fixed bonded-device list.
#[derive(Debug, Default)]
pub struct SimulatedLink {
    bonded: Vec<String>,
    connected: Option<String>,
    fault: FaultSwitch,
}

impl SimulatedLink {
    pub fn new<I, S>(bonded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bonded: bonded.into_iter().map(Into::into).collect(),
            connected: None,
            fault: FaultSwitch::default(),
        }
    }

    pub fn with_fault(mut self, fault: FaultSwitch) -> Self {
        self.fault = fault;
        self
    }
}

impl Link for SimulatedLink {
    fn bonded_devices(&self) -> Vec<String> {
        self.bonded.clone()
    }

    fn connect(&mut self, device: &str) -> DeviceResult<bool> {
        self.fault.check("bluetooth link")?;
        if !self.bonded.iter().any(|d| d == device) {
            tracing::info!(device, "connect refused: device not bonded");
            return Ok(false);
        }
        self.connected = Some(device.to_string());
        tracing::info!(device, "link connected (simulated)");
        Ok(true)
    }

    fn disconnect(&mut self) -> DeviceResult<()> {
        if self.connected.take().is_none() {
            return Err(Box::new(SimError::NotConnected));
        }
        tracing::info!("link disconnected (simulated)");
        Ok(())
    }

    fn connected(&self) -> Option<&str> {
        self.connected.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conveyor_tracks_running_and_rpm() {
        let mut conveyor = SimulatedConveyor::new();
        let probe = conveyor.probe();
        conveyor.set_speed(12).expect("set speed");
        conveyor.start().expect("start");
        assert!(probe.running());
        assert_eq!(probe.rpm(), 12);
        conveyor.stop().expect("stop");
        assert!(!probe.running());
    }

    #[test]
    fn tripped_fault_fails_every_call() {
        let fault = FaultSwitch::new();
        let mut lamp = SimulatedUvLamp::with_fault(fault.clone());
        fault.trip();
        let err = lamp.on().expect_err("tripped");
        assert_eq!(err.to_string(), "uv light not responding");
        fault.clear();
        lamp.on().expect("cleared");
        assert!(lamp.probe().running());
    }

    #[test]
    fn link_refuses_unbonded_devices() {
        let mut link = SimulatedLink::new(["Android_ECleanApp"]);
        assert!(!link.connect("Stranger").expect("no fault"));
        assert!(link.connected().is_none());
        assert!(link.connect("Android_ECleanApp").expect("no fault"));
        assert_eq!(link.connected(), Some("Android_ECleanApp"));
        link.disconnect().expect("disconnect");
        assert!(link.disconnect().is_err());
    }
}
