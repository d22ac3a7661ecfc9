//! Device panel model.
//!
//! Every button press is routed through the `DeviceController` and yields
//! exactly one `Acknowledgment`, which the front end shows as a modal
//! dialog.
use crate::ack::Acknowledgment;
use crate::clock_label::ClockLabel;
use crate::config::PanelSettings;
use crate::controller::DeviceController;
use crate::cycle::{AutoCycle, ConveyorGeometry, CycleTick, ProduceCatalogue, format_mmss};
use crate::error::EcleanError;
use crate::logger::{EventLog, FileLogger, LogEntry};
use crate::machine::{MachineState, Policy};
use crate::status::{DeviceStatus, Tone};
use crate::types::{Action, Produce, Selection, Subsystem, TextField};
use chrono::NaiveTime;
use eclean_traits::{Clock, Lamp, Motor, MonotonicClock};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const PANEL_TITLE: &str = "E-Cleaning Device Panel";
pub const SPEED_PLACEHOLDER: &str = "### rpm";
pub const TIME_PLACEHOLDER: &str = "mm:ss";

pub type SharedClock = Arc<dyn Clock + Send + Sync>;
pub type WallClock = Box<dyn Fn() -> NaiveTime + Send>;

/// What changed on a timer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelTick {
    pub clock_changed: bool,
    /// Seconds left on the automatic cycle, when it counted down.
    pub countdown: Option<u32>,
    /// Set when the automatic cycle finished (or failed to stop).
    pub ack: Option<Acknowledgment>,
}

pub struct DevicePanel<M: Motor, L: Lamp> {
    controller: DeviceController<M, L>,
    clock: SharedClock,
    wall: WallClock,
    selection: Selection,
    motor_speed: TextField,
    time_required: TextField,
    clock_label: ClockLabel,
    catalogue: ProduceCatalogue,
    geometry: ConveyorGeometry,
    cycle: Option<AutoCycle>,
    log: EventLog,
}

impl<M: Motor, L: Lamp> core::fmt::Debug for DevicePanel<M, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DevicePanel")
            .field("controller", &self.controller)
            .field("selection", &self.selection)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl<M: Motor, L: Lamp> DevicePanel<M, L> {
    pub fn title(&self) -> &'static str {
        PANEL_TITLE
    }

    pub fn status(&self) -> DeviceStatus {
        self.controller.status()
    }

    pub fn status_line(&self) -> String {
        self.status().display_line()
    }

    pub fn status_tone(&self) -> Tone {
        self.status().tone()
    }

    pub fn state(&self) -> MachineState {
        self.controller.state()
    }

    pub fn policy(&self) -> Policy {
        self.controller.policy()
    }

    pub fn is_on(&self, sub: Subsystem) -> bool {
        self.controller.state().is_on(sub)
    }

    pub fn run_time(&self, sub: Subsystem) -> Duration {
        self.controller.run_time(sub, self.clock.now())
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn motor_speed_text(&self) -> &str {
        self.motor_speed.text()
    }

    pub fn time_required_text(&self) -> &str {
        self.time_required.text()
    }

    pub fn clock_text(&self) -> &str {
        self.clock_label.text()
    }

    pub fn cycle(&self) -> Option<&AutoCycle> {
        self.cycle.as_ref()
    }

    /// Time until the clock label next refreshes.
    pub fn until_next_tick(&self) -> Duration {
        self.clock_label.until_next(self.clock.now())
    }

    pub fn catalogue(&self) -> &ProduceCatalogue {
        &self.catalogue
    }

    pub fn geometry(&self) -> &ConveyorGeometry {
        &self.geometry
    }

    pub fn activate_conveyor(&mut self) -> Acknowledgment {
        self.act(Action::ConveyorOn)
    }

    pub fn deactivate_conveyor(&mut self) -> Acknowledgment {
        self.act(Action::ConveyorOff)
    }

    pub fn activate_uv_light(&mut self) -> Acknowledgment {
        self.act(Action::UvOn)
    }

    pub fn deactivate_uv_light(&mut self) -> Acknowledgment {
        self.act(Action::UvOff)
    }

    pub fn emergency_stop(&mut self) -> Acknowledgment {
        self.act(Action::EmergencyStop)
    }

    pub fn reset(&mut self) -> Acknowledgment {
        self.act(Action::Reset)
    }

    /// Set the type selector. Touches nothing else on the panel.
    pub fn select_produce(&mut self, produce: Option<Produce>) {
        self.selection = Selection(produce);
        self.log.record("select produce", Some(self.selection.to_string()));
    }

    pub fn select_produce_by_name(&mut self, name: &str) -> Result<(), EcleanError> {
        let produce = name.parse::<Produce>()?;
        self.select_produce(Some(produce));
        Ok(())
    }

    pub fn set_motor_speed_text(&mut self, text: impl Into<String>) {
        self.motor_speed.set(text);
    }

    pub fn set_time_required_text(&mut self, text: impl Into<String>) {
        self.time_required.set(text);
    }

    /// Run the conveyor and UV light for the selected produce's cleaning
    /// time, the belt at the rpm that carries it across in that time.
    pub fn start_auto_cycle(&mut self) -> Acknowledgment {
        match self.try_start_auto_cycle() {
            Ok(ack) => ack,
            Err(e) => {
                self.log.record("auto cycle", Some(format!("refused: {e}")));
                Acknowledgment::refused(&e)
            }
        }
    }

    pub fn view_logs(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.log.entries()
    }

    /// Advance the clock label and the automatic cycle.
    pub fn tick(&mut self) -> PanelTick {
        let now = self.clock.now();
        let mut out = PanelTick {
            clock_changed: self.clock_label.poll(now, (self.wall)()),
            ..PanelTick::default()
        };

        let Some(cycle) = self.cycle.as_mut() else {
            return out;
        };
        match cycle.poll(now) {
            CycleTick::Idle => {}
            CycleTick::Counting(left) => {
                out.countdown = Some(left);
                self.time_required.set(format_mmss(u64::from(left)));
            }
            CycleTick::Finished => {
                let produce = cycle.produce();
                self.cycle = None;
                out.countdown = Some(0);
                self.time_required.set(format_mmss(0));
                out.ack = Some(match self.finish_cycle(now) {
                    Ok(status) => {
                        tracing::info!(%produce, "auto cycle finished");
                        self.log
                            .record(format!("auto cycle {produce} finished"), Some(status.to_string()));
                        Acknowledgment::cycle_complete(produce)
                    }
                    Err(e) => {
                        self.log
                            .record(format!("auto cycle {produce} finished"), Some(format!("refused: {e}")));
                        Acknowledgment::refused(&e)
                    }
                });
            }
        }
        out
    }

    /// Switch everything off and hand the actuators back.
    pub fn into_parts(mut self) -> (M, L) {
        self.controller.shutdown(self.clock.now());
        self.controller.into_parts()
    }

    fn act(&mut self, action: Action) -> Acknowledgment {
        let now = self.clock.now();
        match self.controller.apply(action, now) {
            Ok(status) => {
                self.log.record(action.to_string(), Some(status.to_string()));
                self.cancel_cycle_if_stopped();
                match action {
                    Action::ConveyorOn | Action::UvOn => Acknowledgment::started(),
                    Action::ConveyorOff | Action::UvOff => Acknowledgment::stopped(),
                    Action::EmergencyStop => Acknowledgment::emergency_stopped(),
                    Action::Reset => Acknowledgment::reset(),
                }
            }
            Err(e) => {
                tracing::info!(%action, error = %e, "action refused");
                self.log.record(action.to_string(), Some(format!("refused: {e}")));
                self.cancel_cycle_if_stopped();
                Acknowledgment::refused(&e)
            }
        }
    }

    /// The cycle only runs while the conveyor does.
    fn cancel_cycle_if_stopped(&mut self) {
        if !self.controller.state().conveyor
            && let Some(c) = self.cycle.take()
        {
            tracing::info!(produce = %c.produce(), left = c.remaining_secs(), "auto cycle cancelled");
        }
    }

    /// Switch the UV light and the conveyor off at the end of a cycle.
    fn finish_cycle(&mut self, now: Instant) -> Result<DeviceStatus, EcleanError> {
        let mut status = self.controller.status();
        if self.controller.state().uv {
            status = self.controller.apply(Action::UvOff, now)?;
        }
        if self.controller.state().conveyor {
            status = self.controller.apply(Action::ConveyorOff, now)?;
        }
        Ok(status)
    }

    fn try_start_auto_cycle(&mut self) -> Result<Acknowledgment, EcleanError> {
        let produce = self.selection.produce().ok_or(EcleanError::NoProduceSelected)?;
        let now = self.clock.now();
        self.controller.check(Action::ConveyorOn)?;

        let cycle = AutoCycle::start(produce, &self.catalogue, &self.geometry, now);
        self.controller.set_conveyor_speed(cycle.rpm())?;
        self.controller.apply(Action::ConveyorOn, now)?;
        if !self.controller.state().uv
            && let Err(e) = self.controller.apply(Action::UvOn, now)
        {
            if let Err(stop) = self.controller.apply(Action::ConveyorOff, now) {
                tracing::warn!(error = %stop, "conveyor stop after uv failure");
            }
            return Err(e);
        }

        self.time_required.set(format_mmss(u64::from(cycle.total_secs())));
        self.motor_speed.set(format!("{} rpm", cycle.rpm()));
        tracing::info!(%produce, secs = cycle.total_secs(), rpm = cycle.rpm(), "auto cycle started");
        self.log.record(
            format!("auto cycle {produce}"),
            Some(format!("{}s at {} rpm", cycle.total_secs(), cycle.rpm())),
        );
        self.cycle = Some(cycle);
        Ok(Acknowledgment::started())
    }
}

/// Builder slot not yet filled.
#[derive(Debug, Default)]
pub struct Missing;

pub struct PanelBuilder<M, L> {
    motor: M,
    lamp: L,
    settings: PanelSettings,
    clock: Option<SharedClock>,
    wall: Option<WallClock>,
}

impl Default for PanelBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            motor: Missing,
            lamp: Missing,
            settings: PanelSettings::default(),
            clock: None,
            wall: None,
        }
    }
}

impl PanelBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M, L> PanelBuilder<M, L> {
    pub fn with_motor<M2: Motor>(self, motor: M2) -> PanelBuilder<M2, L> {
        PanelBuilder {
            motor,
            lamp: self.lamp,
            settings: self.settings,
            clock: self.clock,
            wall: self.wall,
        }
    }

    pub fn with_lamp<L2: Lamp>(self, lamp: L2) -> PanelBuilder<M, L2> {
        PanelBuilder {
            motor: self.motor,
            lamp,
            settings: self.settings,
            clock: self.clock,
            wall: self.wall,
        }
    }

    pub fn with_settings(mut self, settings: PanelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Source of the wall time shown by the clock label (local time by default).
    pub fn with_wall_clock(mut self, wall: WallClock) -> Self {
        self.wall = Some(wall);
        self
    }
}

impl<M: Motor, L: Lamp> PanelBuilder<M, L> {
    /// A freshly built panel always starts READY with both subsystems off.
    pub fn build(self) -> DevicePanel<M, L> {
        let clock: SharedClock = match self.clock {
            Some(c) => c,
            None => Arc::new(MonotonicClock::new()),
        };
        let wall: WallClock = match self.wall {
            Some(w) => w,
            None => Box::new(|| chrono::Local::now().time()),
        };
        let s = self.settings;
        let now = clock.now();
        let mut log = EventLog::new(s.log_capacity);
        if let Some(path) = &s.log_file {
            log = log.with_sink(Box::new(FileLogger::new(path.clone())));
        }
        log.record("panel opened", Some(DeviceStatus::Ready.to_string()));
        DevicePanel {
            controller: DeviceController::new(self.motor, self.lamp, s.policy, s.uv_requires_conveyor),
            clock_label: ClockLabel::new(now, s.clock_tick, wall()),
            clock,
            wall,
            selection: Selection::default(),
            motor_speed: TextField::new(SPEED_PLACEHOLDER),
            time_required: TextField::new(TIME_PLACEHOLDER),
            catalogue: s.catalogue,
            geometry: s.geometry,
            cycle: None,
            log,
        }
    }
}
