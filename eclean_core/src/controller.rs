//! Drives the conveyor motor and UV lamp to follow the state machine.

use crate::error::EcleanError;
use crate::machine::{Machine, MachineState, Policy};
use crate::status::DeviceStatus;
use crate::types::{Action, Subsystem};
use eclean_traits::{Lamp, Motor};
use std::time::{Duration, Instant};

/// Accumulated on-time of one subsystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTimer {
    since: Option<Instant>,
    total: Duration,
}

impl RunTimer {
    fn switch(&mut self, on: bool, now: Instant) {
        match (on, self.since) {
            (true, None) => self.since = Some(now),
            (false, Some(start)) => {
                self.total += now.saturating_duration_since(start);
                self.since = None;
            }
            _ => {}
        }
    }

    /// Total on-time up to `now`, including the current run.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let current = self
            .since
            .map_or(Duration::ZERO, |s| now.saturating_duration_since(s));
        self.total + current
    }
}

pub struct DeviceController<M: Motor, L: Lamp> {
    machine: Machine,
    motor: M,
    lamp: L,
    conveyor_time: RunTimer,
    uv_time: RunTimer,
}

impl<M: Motor, L: Lamp> core::fmt::Debug for DeviceController<M, L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceController")
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

impl<M: Motor, L: Lamp> DeviceController<M, L> {
    pub fn new(motor: M, lamp: L, policy: Policy, uv_requires_conveyor: bool) -> Self {
        Self {
            machine: Machine::new(policy, uv_requires_conveyor),
            motor,
            lamp,
            conveyor_time: RunTimer::default(),
            uv_time: RunTimer::default(),
        }
    }

    pub fn state(&self) -> MachineState {
        self.machine.state()
    }

    pub fn status(&self) -> DeviceStatus {
        self.machine.status()
    }

    pub fn policy(&self) -> Policy {
        self.machine.policy()
    }

    pub fn run_time(&self, sub: Subsystem, now: Instant) -> Duration {
        match sub {
            Subsystem::Conveyor => self.conveyor_time.elapsed(now),
            Subsystem::UvLight => self.uv_time.elapsed(now),
        }
    }

    /// Whether `action` would be accepted right now.
    pub fn check(&self, action: Action) -> Result<(), EcleanError> {
        self.machine.plan(action).map(|_| ())
    }

    pub fn set_conveyor_speed(&mut self, rpm: u32) -> Result<(), EcleanError> {
        self.motor
            .set_speed(rpm)
            .map_err(|e| EcleanError::DeviceNotResponding(e.to_string()))
    }

    /// Apply `action`: plan the transition, drive the actuators, commit.
    ///
    /// Emergency stop always commits, even if an actuator reports an error.
    /// For any other action an actuator error leaves the machine in the state
    /// the actuators actually reached and is returned as `DeviceNotResponding`.
    pub fn apply(&mut self, action: Action, now: Instant) -> Result<DeviceStatus, EcleanError> {
        let from = self.machine.state();
        let target = self.machine.plan(action)?;

        if action == Action::EmergencyStop {
            self.halt_all();
            self.commit(target, now);
            return Ok(self.status());
        }

        // UV first so a cascading conveyor stop never leaves the lamp on alone.
        let mut reached = from;
        if from.uv != target.uv {
            if let Err(e) = self.drive(Subsystem::UvLight, target.uv) {
                tracing::warn!(%action, error = %e, "uv light did not respond");
                return Err(e);
            }
            reached.uv = target.uv;
        }
        if from.conveyor != target.conveyor {
            if let Err(e) = self.drive(Subsystem::Conveyor, target.conveyor) {
                tracing::warn!(%action, error = %e, "conveyor did not respond");
                if reached != from {
                    reached.status = if reached.conveyor || reached.uv {
                        DeviceStatus::Running
                    } else {
                        DeviceStatus::Stopped
                    };
                    self.commit(reached, now);
                }
                return Err(e);
            }
        }

        self.commit(target, now);
        Ok(self.status())
    }

    /// Switch every subsystem off, best effort, without changing the status.
    /// Used when the panel closes.
    pub fn shutdown(&mut self, now: Instant) {
        let s = self.machine.state();
        if s.conveyor || s.uv {
            self.halt_all();
            self.commit(
                MachineState {
                    conveyor: false,
                    uv: false,
                    ..s
                },
                now,
            );
        }
    }

    pub fn into_parts(self) -> (M, L) {
        (self.motor, self.lamp)
    }

    fn drive(&mut self, sub: Subsystem, on: bool) -> Result<(), EcleanError> {
        let res = match (sub, on) {
            (Subsystem::Conveyor, true) => self.motor.start(),
            (Subsystem::Conveyor, false) => self.motor.stop(),
            (Subsystem::UvLight, true) => self.lamp.on(),
            (Subsystem::UvLight, false) => self.lamp.off(),
        };
        res.map_err(|e| EcleanError::DeviceNotResponding(e.to_string()))
    }

    fn halt_all(&mut self) {
        if let Err(e) = self.motor.stop() {
            tracing::warn!(error = %e, "motor stop failed on halt");
        }
        if let Err(e) = self.lamp.off() {
            tracing::warn!(error = %e, "uv light off failed on halt");
        }
    }

    fn commit(&mut self, next: MachineState, now: Instant) {
        self.conveyor_time.switch(next.conveyor, now);
        self.uv_time.switch(next.uv, now);
        self.machine.commit(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclean_hardware::{FaultSwitch, SimulatedConveyor, SimulatedUvLamp};

    fn controller(policy: Policy) -> DeviceController<SimulatedConveyor, SimulatedUvLamp> {
        DeviceController::new(SimulatedConveyor::new(), SimulatedUvLamp::new(), policy, false)
    }

    #[test]
    fn actuators_follow_transitions() {
        let conveyor = SimulatedConveyor::new();
        let lamp = SimulatedUvLamp::new();
        let (cp, lp) = (conveyor.probe(), lamp.probe());
        let mut c = DeviceController::new(conveyor, lamp, Policy::Strict, false);
        let now = Instant::now();

        c.apply(Action::ConveyorOn, now).expect("conveyor on");
        c.apply(Action::UvOn, now).expect("uv on");
        assert!(cp.running() && lp.running());

        c.apply(Action::EmergencyStop, now).expect("estop");
        assert!(!cp.running() && !lp.running());
        assert_eq!(c.status(), DeviceStatus::EmergencyStopped);
    }

    #[test]
    fn run_time_accumulates_across_runs() {
        let mut c = controller(Policy::Strict);
        let t0 = Instant::now();
        c.apply(Action::ConveyorOn, t0).expect("on");
        c.apply(Action::ConveyorOff, t0 + Duration::from_secs(3))
            .expect("off");
        c.apply(Action::ConveyorOn, t0 + Duration::from_secs(10))
            .expect("on");
        let at = t0 + Duration::from_secs(12);
        assert_eq!(c.run_time(Subsystem::Conveyor, at), Duration::from_secs(5));
        assert_eq!(c.run_time(Subsystem::UvLight, at), Duration::ZERO);
    }

    #[test]
    fn unresponsive_motor_leaves_status_unchanged() {
        let fault = FaultSwitch::new();
        let mut c = DeviceController::new(
            SimulatedConveyor::with_fault(fault.clone()),
            SimulatedUvLamp::new(),
            Policy::Strict,
            false,
        );
        fault.trip();
        let err = c
            .apply(Action::ConveyorOn, Instant::now())
            .expect_err("fault");
        assert_eq!(
            err,
            EcleanError::DeviceNotResponding("conveyor not responding".into())
        );
        assert_eq!(c.status(), DeviceStatus::Ready);
        assert!(!c.state().conveyor);
    }

    #[test]
    fn emergency_stop_commits_despite_faults() {
        let fault = FaultSwitch::new();
        let mut c = DeviceController::new(
            SimulatedConveyor::with_fault(fault.clone()),
            SimulatedUvLamp::new(),
            Policy::Strict,
            false,
        );
        let now = Instant::now();
        c.apply(Action::ConveyorOn, now).expect("on");
        fault.trip();
        assert_eq!(
            c.apply(Action::EmergencyStop, now),
            Ok(DeviceStatus::EmergencyStopped)
        );
    }

    #[test]
    fn partial_cascade_failure_records_reached_state() {
        let fault = FaultSwitch::new();
        let mut c = DeviceController::new(
            SimulatedConveyor::with_fault(fault.clone()),
            SimulatedUvLamp::new(),
            Policy::Strict,
            true,
        );
        let now = Instant::now();
        c.apply(Action::ConveyorOn, now).expect("conveyor");
        c.apply(Action::UvOn, now).expect("uv");
        fault.trip();
        c.apply(Action::ConveyorOff, now).expect_err("conveyor fault");
        let s = c.state();
        assert!(!s.uv, "uv was switched off before the conveyor failed");
        assert!(s.conveyor);
        assert_eq!(s.status, DeviceStatus::Running);
    }

    #[test]
    fn shutdown_switches_everything_off() {
        let conveyor = SimulatedConveyor::new();
        let probe = conveyor.probe();
        let mut c = DeviceController::new(conveyor, SimulatedUvLamp::new(), Policy::Strict, false);
        let now = Instant::now();
        c.apply(Action::ConveyorOn, now).expect("on");
        c.shutdown(now);
        assert!(!probe.running());
        assert!(!c.state().conveyor);
    }
}
