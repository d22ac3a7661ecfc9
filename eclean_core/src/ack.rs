//! User-visible acknowledgments, shown by the front end as modal dialogs.
use crate::error::EcleanError;
use crate::types::Produce;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Acknowledgment {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn started() -> Self {
        Self::new(
            Severity::Info,
            "System Start",
            "Cleaning cycle started successfully.",
        )
    }

    pub fn stopped() -> Self {
        Self::new(Severity::Warning, "System Stop", "Cleaning cycle stopped.")
    }

    pub fn emergency_stopped() -> Self {
        Self::new(
            Severity::Error,
            "EMERGENCY STOP",
            "Emergency stop activated! Device halted.",
        )
    }

    pub fn reset() -> Self {
        Self::new(
            Severity::Info,
            "System Reset",
            "Emergency stop cleared. Device ready.",
        )
    }

    pub fn cycle_complete(produce: Produce) -> Self {
        Self::new(
            Severity::Info,
            "Cycle Complete",
            format!("{produce} cleaning finished."),
        )
    }

    pub fn refused(err: &EcleanError) -> Self {
        let title = match err {
            EcleanError::DeviceNotResponding(_) => "Device Not Responding",
            _ => "Action Refused",
        };
        Self::new(Severity::Error, title, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity.name(), self.title, self.message)
    }
}
