//! Device status indicator shown at the top of the panel.

use std::fmt;

/// Colour hint carried alongside displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Blue,
    Green,
    Orange,
    Red,
}

impl Tone {
    pub fn name(self) -> &'static str {
        match self {
            Tone::Blue => "blue",
            Tone::Green => "green",
            Tone::Orange => "orange",
            Tone::Red => "red",
        }
    }
}

/// Overall device status. Reset to `Ready` whenever the panel is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    #[default]
    Ready,
    Running,
    Stopped,
    EmergencyStopped,
}

impl DeviceStatus {
    pub fn label(self) -> &'static str {
        match self {
            DeviceStatus::Ready => "READY",
            DeviceStatus::Running => "RUNNING",
            DeviceStatus::Stopped => "STOPPED",
            DeviceStatus::EmergencyStopped => "EMERGENCY STOPPED",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            DeviceStatus::Ready | DeviceStatus::Running => Tone::Green,
            DeviceStatus::Stopped => Tone::Orange,
            DeviceStatus::EmergencyStopped => Tone::Red,
        }
    }

    /// Text of the status display, e.g. `Status: READY`.
    pub fn display_line(self) -> String {
        format!("Status: {}", self.label())
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_tones() {
        assert_eq!(DeviceStatus::default(), DeviceStatus::Ready);
        assert_eq!(DeviceStatus::Ready.display_line(), "Status: READY");
        assert_eq!(
            DeviceStatus::EmergencyStopped.display_line(),
            "Status: EMERGENCY STOPPED"
        );
        assert_eq!(DeviceStatus::Stopped.tone(), Tone::Orange);
        assert_eq!(DeviceStatus::EmergencyStopped.tone(), Tone::Red);
    }
}
