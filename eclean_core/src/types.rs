use crate::error::EcleanError;
use std::fmt;
use std::str::FromStr;

/// Produce offered by the type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Produce {
    Apple,
    Banana,
    Carrot,
    Tomato,
    Potato,
}

impl Produce {
    /// Selector options in display order.
    pub const ALL: [Produce; 5] = [
        Produce::Apple,
        Produce::Banana,
        Produce::Carrot,
        Produce::Tomato,
        Produce::Potato,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Produce::Apple => "Apple",
            Produce::Banana => "Banana",
            Produce::Carrot => "Carrot",
            Produce::Tomato => "Tomato",
            Produce::Potato => "Potato",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Produce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Produce {
    type Err = EcleanError;

    /// Case-insensitive match on the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Produce::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| EcleanError::UnknownProduce(needle.to_string()))
    }
}

/// Current value of the type selector; `None` shows the `Select` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection(pub Option<Produce>);

impl Selection {
    pub const PROMPT: &'static str = "Select";

    pub fn produce(self) -> Option<Produce> {
        self.0
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => f.write_str(p.name()),
            None => f.write_str(Self::PROMPT),
        }
    }
}

/// Free-text entry seeded with a placeholder. Never parsed by panel actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    placeholder: &'static str,
}

impl TextField {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            text: placeholder.to_string(),
            placeholder,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_placeholder(&self) -> bool {
        self.text == self.placeholder
    }
}

/// The two independently controlled subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Conveyor,
    UvLight,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Conveyor => f.write_str("conveyor"),
            Subsystem::UvLight => f.write_str("UV light"),
        }
    }
}

/// Operator actions accepted by the device state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ConveyorOn,
    ConveyorOff,
    UvOn,
    UvOff,
    EmergencyStop,
    Reset,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::ConveyorOn,
        Action::ConveyorOff,
        Action::UvOn,
        Action::UvOff,
        Action::EmergencyStop,
        Action::Reset,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::ConveyorOn => "start conveyor",
            Action::ConveyorOff => "stop conveyor",
            Action::UvOn => "switch on UV light",
            Action::UvOff => "switch off UV light",
            Action::EmergencyStop => "emergency stop",
            Action::Reset => "reset",
        };
        f.write_str(s)
    }
}
