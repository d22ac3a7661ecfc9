//! Seams between the E-Cleaning panel model and whatever drives the device.
//!
//! The model only ever talks to a conveyor `Motor`, a UV `Lamp` and a
//! Bluetooth-ish `Link` through these traits; the workspace ships simulated
//! implementations in `eclean_hardware`.
pub mod clock;

pub use clock::{Clock, MonotonicClock};

pub type DeviceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Conveyor drive motor.
pub trait Motor {
    fn set_speed(&mut self, rpm: u32) -> DeviceResult<()>;
    fn start(&mut self) -> DeviceResult<()>;
    fn stop(&mut self) -> DeviceResult<()>;
}

/// UV light bank.
pub trait Lamp {
    fn on(&mut self) -> DeviceResult<()>;
    fn off(&mut self) -> DeviceResult<()>;
}

/// Transport used to pair with the cleaning device.
pub trait Link {
    /// Names of devices already bonded with this host.
    fn bonded_devices(&self) -> Vec<String>;
    /// Connect to `device`; `Ok(false)` means the peer refused.
    fn connect(&mut self, device: &str) -> DeviceResult<bool>;
    fn disconnect(&mut self) -> DeviceResult<()>;
    fn connected(&self) -> Option<&str>;
}

impl<M: Motor + ?Sized> Motor for Box<M> {
    fn set_speed(&mut self, rpm: u32) -> DeviceResult<()> {
        (**self).set_speed(rpm)
    }
    fn start(&mut self) -> DeviceResult<()> {
        (**self).start()
    }
    fn stop(&mut self) -> DeviceResult<()> {
        (**self).stop()
    }
}

impl<L: Lamp + ?Sized> Lamp for Box<L> {
    fn on(&mut self) -> DeviceResult<()> {
        (**self).on()
    }
    fn off(&mut self) -> DeviceResult<()> {
        (**self).off()
    }
}
