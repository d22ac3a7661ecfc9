//! Device state machine.
//!
//! The machine is pure: `plan` maps the current state and an action to the
//! next state (or a refusal) without touching any actuator. The controller
//! drives the motor and lamp to match and then commits the result.

use crate::error::{EcleanError, Refusal};
use crate::status::DeviceStatus;
use crate::types::{Action, Subsystem};

/// How panel actions are gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Preconditions enforced, emergency stop latches until reset.
    #[default]
    Strict,
    /// Every action is accepted and sets the status it names.
    Permissive,
}

/// Status plus the on/off state of both subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineState {
    pub status: DeviceStatus,
    pub conveyor: bool,
    pub uv: bool,
}

impl MachineState {
    pub fn is_on(&self, s: Subsystem) -> bool {
        match s {
            Subsystem::Conveyor => self.conveyor,
            Subsystem::UvLight => self.uv,
        }
    }

    fn with(mut self, s: Subsystem, on: bool) -> Self {
        match s {
            Subsystem::Conveyor => self.conveyor = on,
            Subsystem::UvLight => self.uv = on,
        }
        self
    }

    /// Status implied by the subsystem flags after an on/off action.
    fn derived(mut self) -> Self {
        self.status = if self.conveyor || self.uv {
            DeviceStatus::Running
        } else {
            DeviceStatus::Stopped
        };
        self
    }

    fn halted(status: DeviceStatus) -> Self {
        Self {
            status,
            conveyor: false,
            uv: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Machine {
    state: MachineState,
    policy: Policy,
    uv_requires_conveyor: bool,
}

impl Machine {
    pub fn new(policy: Policy, uv_requires_conveyor: bool) -> Self {
        Self {
            state: MachineState::default(),
            policy,
            uv_requires_conveyor,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn status(&self) -> DeviceStatus {
        self.state.status
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Compute the state `action` leads to, without committing it.
    pub fn plan(&self, action: Action) -> Result<MachineState, EcleanError> {
        match self.policy {
            Policy::Permissive => Ok(self.plan_permissive(action)),
            Policy::Strict => self.plan_strict(action),
        }
    }

    pub fn commit(&mut self, next: MachineState) {
        if next != self.state {
            tracing::info!(
                from = %self.state.status,
                to = %next.status,
                conveyor = next.conveyor,
                uv = next.uv,
                "device state changed"
            );
        }
        self.state = next;
    }

    fn plan_permissive(&self, action: Action) -> MachineState {
        let s = self.state;
        match action {
            Action::ConveyorOn => MachineState {
                status: DeviceStatus::Running,
                ..s.with(Subsystem::Conveyor, true)
            },
            Action::ConveyorOff => MachineState {
                status: DeviceStatus::Stopped,
                ..s.with(Subsystem::Conveyor, false)
            },
            Action::UvOn => MachineState {
                status: DeviceStatus::Running,
                ..s.with(Subsystem::UvLight, true)
            },
            Action::UvOff => MachineState {
                status: DeviceStatus::Stopped,
                ..s.with(Subsystem::UvLight, false)
            },
            Action::EmergencyStop => MachineState::halted(DeviceStatus::EmergencyStopped),
            Action::Reset => MachineState::halted(DeviceStatus::Ready),
        }
    }

    fn plan_strict(&self, action: Action) -> Result<MachineState, EcleanError> {
        use Action::*;
        use DeviceStatus::*;

        let s = self.state;
        let refuse = |reason: Refusal| EcleanError::InvalidTransition {
            from: s.status,
            action,
            reason,
        };

        match (s.status, action) {
            // Emergency stop is always accepted and keeps the latch.
            (_, EmergencyStop) => Ok(MachineState::halted(EmergencyStopped)),
            (EmergencyStopped, Reset) => Ok(MachineState::halted(Ready)),
            (EmergencyStopped, _) => Err(refuse(Refusal::EmergencyStopLatched)),

            (_, Reset) if s.conveyor || s.uv => Err(refuse(Refusal::StillRunning)),
            (_, Reset) => Ok(MachineState::halted(Ready)),

            (_, ConveyorOn) => switch_on(s, Subsystem::Conveyor).map_err(refuse),
            (_, UvOn) if self.uv_requires_conveyor && !s.conveyor => {
                Err(refuse(Refusal::Interlock))
            }
            (_, UvOn) => switch_on(s, Subsystem::UvLight).map_err(refuse),
            (_, ConveyorOff) => {
                let next = switch_off(s, Subsystem::Conveyor).map_err(refuse)?;
                if self.uv_requires_conveyor {
                    Ok(next.with(Subsystem::UvLight, false).derived())
                } else {
                    Ok(next)
                }
            }
            (_, UvOff) => switch_off(s, Subsystem::UvLight).map_err(refuse),
        }
    }
}

fn switch_on(s: MachineState, sub: Subsystem) -> Result<MachineState, Refusal> {
    if s.is_on(sub) {
        return Err(Refusal::AlreadyOn(sub));
    }
    Ok(s.with(sub, true).derived())
}

fn switch_off(s: MachineState, sub: Subsystem) -> Result<MachineState, Refusal> {
    if !s.is_on(sub) {
        return Err(Refusal::AlreadyOff(sub));
    }
    Ok(s.with(sub, false).derived())
}
