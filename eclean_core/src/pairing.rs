//! Pairing screen model.
//!
//! Shows a Bluetooth status banner. Pairing flips the banner to the paired
//! message and arms a one-shot timer; when it fires the screen closes and
//! asks the app to open the device panel.
use crate::config::PairingSettings;
use crate::error::EcleanError;
use crate::status::Tone;
use crate::timer::OneShot;
use eclean_traits::Link;
use std::time::{Duration, Instant};

pub const WINDOW_TITLE: &str = "Bluetooth Status";
pub const PAIR_BUTTON: &str = "Simulate Pairing";
pub const READY_TEXT: &str = "🔵 Bluetooth Enabled\nReady to pair...";

pub fn paired_text(device: &str) -> String {
    format!("✅ {device} Paired!")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingEvent {
    /// The delay elapsed: open the panel, this screen is now closed.
    OpenPanel,
}

#[derive(Debug, Clone)]
pub struct PairingScreen {
    device_name: String,
    delay: Duration,
    text: String,
    tone: Tone,
    timer: OneShot,
    paired_with: Option<String>,
    closed: bool,
}

impl PairingScreen {
    pub fn new(settings: &PairingSettings) -> Self {
        Self {
            device_name: settings.device_name.clone(),
            delay: settings.delay,
            text: READY_TEXT.to_string(),
            tone: Tone::Blue,
            timer: OneShot::default(),
            paired_with: None,
            closed: false,
        }
    }

    pub fn status_text(&self) -> &str {
        &self.text
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True while the paired banner is shown and the panel has not opened.
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn paired_with(&self) -> Option<&str> {
        self.paired_with.as_deref()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Mark the configured device as paired and schedule the panel.
    /// Pressing again while pending keeps the original deadline.
    pub fn simulate_pairing(&mut self, now: Instant) {
        let device = self.device_name.clone();
        self.mark_paired(device, now);
    }

    /// Pair through `link`. On success this behaves like
    /// `simulate_pairing` for `device`; on failure the banner turns red and
    /// nothing is scheduled.
    pub fn pair_via<L: Link + ?Sized>(
        &mut self,
        link: &mut L,
        device: &str,
        now: Instant,
    ) -> Result<(), EcleanError> {
        if self.closed || self.is_pending() {
            return Ok(());
        }
        let err = match link.connect(device) {
            Ok(true) => {
                self.mark_paired(device.to_string(), now);
                return Ok(());
            }
            Ok(false) => EcleanError::PairingRefused(device.to_string()),
            Err(e) => EcleanError::DeviceNotResponding(e.to_string()),
        };
        tracing::warn!(device, error = %err, "pairing failed");
        self.text = format!("❌ Pairing failed: {err}");
        self.tone = Tone::Red;
        Err(err)
    }

    /// Fire the pending transition once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<PairingEvent> {
        if self.closed || !self.timer.poll(now) {
            return None;
        }
        self.closed = true;
        tracing::debug!(device = ?self.paired_with, "pairing delay elapsed, opening panel");
        Some(PairingEvent::OpenPanel)
    }

    fn mark_paired(&mut self, device: String, now: Instant) {
        if self.closed {
            return;
        }
        self.text = paired_text(&device);
        self.tone = Tone::Green;
        if self.timer.arm(now, self.delay) {
            tracing::info!(device = %device, delay_ms = self.delay.as_millis() as u64, "paired");
        }
        self.paired_with = Some(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclean_hardware::{FaultSwitch, SimulatedLink};

    fn screen() -> PairingScreen {
        PairingScreen::new(&PairingSettings::default())
    }

    #[test]
    fn starts_with_ready_banner() {
        let s = screen();
        assert_eq!(s.status_text(), "🔵 Bluetooth Enabled\nReady to pair...");
        assert_eq!(s.tone(), Tone::Blue);
        assert!(!s.is_pending());
        assert!(!s.is_closed());
    }

    #[test]
    fn pairing_shows_banner_then_opens_panel_after_delay() {
        let mut s = screen();
        let t0 = Instant::now();
        s.simulate_pairing(t0);
        assert_eq!(s.status_text(), "✅ Android_ECleanApp Paired!");
        assert_eq!(s.tone(), Tone::Green);
        assert_eq!(s.poll(t0 + Duration::from_millis(1999)), None);
        assert!(!s.is_closed());
        assert_eq!(
            s.poll(t0 + Duration::from_millis(2000)),
            Some(PairingEvent::OpenPanel)
        );
        assert!(s.is_closed());
        assert_eq!(s.poll(t0 + Duration::from_millis(4000)), None);
    }

    #[test]
    fn second_press_does_not_push_the_deadline() {
        let mut s = screen();
        let t0 = Instant::now();
        s.simulate_pairing(t0);
        s.simulate_pairing(t0 + Duration::from_millis(1500));
        assert_eq!(
            s.poll(t0 + Duration::from_millis(2000)),
            Some(PairingEvent::OpenPanel)
        );
    }

    #[test]
    fn pairing_via_link_uses_the_chosen_device() {
        let mut s = screen();
        let mut link = SimulatedLink::new(["Android_ECleanApp", "Washer_2"]);
        let t0 = Instant::now();
        s.pair_via(&mut link, "Washer_2", t0).expect("paired");
        assert_eq!(s.status_text(), "✅ Washer_2 Paired!");
        assert_eq!(s.paired_with(), Some("Washer_2"));
        assert_eq!(link.connected(), Some("Washer_2"));
        assert!(s.is_pending());
    }

    #[test]
    fn refused_pairing_turns_banner_red_and_schedules_nothing() {
        let mut s = screen();
        let mut link = SimulatedLink::new(["Android_ECleanApp"]);
        let t0 = Instant::now();
        let err = s.pair_via(&mut link, "Stranger", t0).expect_err("refused");
        assert_eq!(err, EcleanError::PairingRefused("Stranger".into()));
        assert_eq!(s.tone(), Tone::Red);
        assert!(s.status_text().starts_with("❌ Pairing failed"));
        assert_eq!(s.poll(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn link_fault_is_reported_as_not_responding() {
        let mut s = screen();
        let fault = FaultSwitch::new();
        fault.trip();
        let mut link = SimulatedLink::new(["Android_ECleanApp"]).with_fault(fault);
        let err = s
            .pair_via(&mut link, "Android_ECleanApp", Instant::now())
            .expect_err("fault");
        assert!(matches!(err, EcleanError::DeviceNotResponding(_)));
    }
}
