use crate::status::DeviceStatus;
use crate::types::{Action, Subsystem};
use thiserror::Error;

/// Why the state machine refused an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Emergency stop is latched; only reset or another e-stop are accepted.
    EmergencyStopLatched,
    AlreadyOn(Subsystem),
    AlreadyOff(Subsystem),
    /// UV light may only run while the conveyor runs.
    Interlock,
    /// Reset requested while a subsystem is still running.
    StillRunning,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Refusal::EmergencyStopLatched => write!(f, "emergency stop is latched, reset first"),
            Refusal::AlreadyOn(s) => write!(f, "{s} is already on"),
            Refusal::AlreadyOff(s) => write!(f, "{s} is already off"),
            Refusal::Interlock => write!(f, "UV light requires the conveyor to be running"),
            Refusal::StillRunning => write!(f, "stop all subsystems before reset"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EcleanError {
    #[error("cannot {action} while {from}: {reason}")]
    InvalidTransition {
        from: DeviceStatus,
        action: Action,
        reason: Refusal,
    },
    #[error("device not responding: {0}")]
    DeviceNotResponding(String),
    #[error("no produce selected")]
    NoProduceSelected,
    #[error("unknown produce: {0}")]
    UnknownProduce(String),
    #[error("pairing refused by {0}")]
    PairingRefused(String),
    #[error("not paired")]
    NotPaired,
    #[error("configuration error: {0}")]
    Config(String),
}
