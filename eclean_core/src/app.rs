//! Screen flow: pairing screen, then device panel.
use crate::config::{PairingSettings, PanelSettings};
use crate::error::EcleanError;
use crate::pairing::{PairingEvent, PairingScreen};
use crate::panel::{DevicePanel, PanelBuilder, PanelTick, SharedClock, WallClock};
use eclean_traits::{Lamp, Link, Motor};

pub enum Screen<M: Motor, L: Lamp> {
    Pairing(PairingScreen),
    Panel(Box<DevicePanel<M, L>>),
}

/// What happened on one pass of `App::tick`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppTick {
    /// The pairing delay elapsed and the panel was opened.
    pub panel_opened: bool,
    pub panel: PanelTick,
}

impl AppTick {
    pub fn needs_redraw(&self) -> bool {
        self.panel_opened
            || self.panel.clock_changed
            || self.panel.countdown.is_some()
            || self.panel.ack.is_some()
    }
}

pub struct App<M: Motor, L: Lamp, K: Link> {
    screen: Screen<M, L>,
    /// Actuators parked while the pairing screen is shown.
    parked: Option<(M, L)>,
    link: K,
    pairing: PairingSettings,
    panel: PanelSettings,
    clock: SharedClock,
    wall: Option<fn() -> chrono::NaiveTime>,
}

impl<M: Motor, L: Lamp, K: Link> App<M, L, K> {
    pub fn new(
        motor: M,
        lamp: L,
        link: K,
        pairing: PairingSettings,
        panel: PanelSettings,
        clock: SharedClock,
    ) -> Self {
        Self {
            screen: Screen::Pairing(PairingScreen::new(&pairing)),
            parked: Some((motor, lamp)),
            link,
            pairing,
            panel,
            clock,
            wall: None,
        }
    }

    /// Fixed wall-time source for the panel clock label.
    pub fn with_wall_clock(mut self, wall: fn() -> chrono::NaiveTime) -> Self {
        self.wall = Some(wall);
        self
    }

    pub fn screen(&self) -> &Screen<M, L> {
        &self.screen
    }

    pub fn pairing_screen(&self) -> Option<&PairingScreen> {
        match &self.screen {
            Screen::Pairing(p) => Some(p),
            Screen::Panel(_) => None,
        }
    }

    pub fn panel(&self) -> Option<&DevicePanel<M, L>> {
        match &self.screen {
            Screen::Panel(p) => Some(&**p),
            Screen::Pairing(_) => None,
        }
    }

    pub fn panel_mut(&mut self) -> Option<&mut DevicePanel<M, L>> {
        match &mut self.screen {
            Screen::Panel(p) => Some(&mut **p),
            Screen::Pairing(_) => None,
        }
    }

    /// Current instant on the app's clock.
    pub fn now(&self) -> std::time::Instant {
        self.clock.now()
    }

    pub fn link(&self) -> &K {
        &self.link
    }

    /// Time until the next timer on the current screen is due, if one is.
    pub fn until_next_tick(&self) -> Option<std::time::Duration> {
        let now = self.clock.now();
        match &self.screen {
            Screen::Pairing(p) => p.remaining(now),
            Screen::Panel(panel) => Some(panel.until_next_tick()),
        }
    }

    pub fn bonded_devices(&self) -> Vec<String> {
        self.link.bonded_devices()
    }

    /// The "Simulate Pairing" button.
    pub fn simulate_pairing(&mut self) -> Result<(), EcleanError> {
        let now = self.clock.now();
        match &mut self.screen {
            Screen::Pairing(p) => {
                p.simulate_pairing(now);
                Ok(())
            }
            Screen::Panel(_) => Ok(()),
        }
    }

    /// Pair with a specific bonded device through the link.
    pub fn pair_with(&mut self, device: &str) -> Result<(), EcleanError> {
        let now = self.clock.now();
        match &mut self.screen {
            Screen::Pairing(p) => p.pair_via(&mut self.link, device, now),
            Screen::Panel(_) => Ok(()),
        }
    }

    /// Close the panel, drop the link and go back to a fresh pairing screen.
    pub fn disconnect(&mut self) -> Result<(), EcleanError> {
        let screen = std::mem::replace(
            &mut self.screen,
            Screen::Pairing(PairingScreen::new(&self.pairing)),
        );
        match screen {
            Screen::Panel(panel) => {
                self.parked = Some(panel.into_parts());
                if self.link.connected().is_some()
                    && let Err(e) = self.link.disconnect()
                {
                    tracing::warn!(error = %e, "link disconnect failed");
                }
                tracing::info!("panel closed, back to pairing");
                Ok(())
            }
            Screen::Pairing(p) => {
                self.screen = Screen::Pairing(p);
                Err(EcleanError::NotPaired)
            }
        }
    }

    /// Run panel-side operations, refusing while the pairing screen is up.
    pub fn with_panel<T>(
        &mut self,
        f: impl FnOnce(&mut DevicePanel<M, L>) -> T,
    ) -> Result<T, EcleanError> {
        self.panel_mut().map(f).ok_or(EcleanError::NotPaired)
    }

    /// Poll every timer on the current screen.
    pub fn tick(&mut self) -> AppTick {
        let now = self.clock.now();
        let mut out = AppTick::default();
        match &mut self.screen {
            Screen::Pairing(p) => {
                if p.poll(now) == Some(PairingEvent::OpenPanel) {
                    self.open_panel();
                    out.panel_opened = true;
                }
            }
            Screen::Panel(panel) => out.panel = panel.tick(),
        }
        out
    }

    fn open_panel(&mut self) {
        let Some((motor, lamp)) = self.parked.take() else {
            tracing::warn!("panel requested without parked actuators");
            return;
        };
        let mut builder = PanelBuilder::new()
            .with_motor(motor)
            .with_lamp(lamp)
            .with_settings(self.panel.clone())
            .with_clock(self.clock.clone());
        if let Some(wall) = self.wall {
            let wall: WallClock = Box::new(wall);
            builder = builder.with_wall_clock(wall);
        }
        self.screen = Screen::Panel(Box::new(builder.build()));
        tracing::info!("device panel opened");
    }
}
