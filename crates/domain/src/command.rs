//! Command — a single instruction sent to exactly one device.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::device::Capability;

/// What a command changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Dim,
    Temperature,
    Color,
    OnOff,
}

impl CommandKind {
    /// Name of the device action card, as in `homey:device:<id>:<action>`.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Dim => "dim",
            Self::Temperature => "temperature",
            Self::Color => "color",
            Self::OnOff => "onoff",
        }
    }

    /// Capability written when the command is sent as a plain value.
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::Dim => Capability::DIM,
            Self::Temperature => Capability::LIGHT_TEMPERATURE,
            Self::Color => Capability::LIGHT_HUE,
            Self::OnOff => Capability::ONOFF,
        }
    }
}

/// Payload of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandValue {
    Number(f64),
    Bool(bool),
    Color(HexColor),
}

impl CommandValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One instruction for one device.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub value: CommandValue,
    /// Transition time; commands with one go through the action port.
    pub transition: Option<Duration>,
}

impl Command {
    #[must_use]
    pub fn dim(value: f64) -> Self {
        Self::new(CommandKind::Dim, CommandValue::Number(value))
    }

    #[must_use]
    pub fn temperature(value: f64) -> Self {
        Self::new(CommandKind::Temperature, CommandValue::Number(value))
    }

    #[must_use]
    pub fn color(color: HexColor) -> Self {
        Self::new(CommandKind::Color, CommandValue::Color(color))
    }

    #[must_use]
    pub fn on_off(on: bool) -> Self {
        Self::new(CommandKind::OnOff, CommandValue::Bool(on))
    }

    fn new(kind: CommandKind, value: CommandValue) -> Self {
        Self {
            kind,
            value,
            transition: None,
        }
    }

    /// Attach a transition; a zero duration means none.
    #[must_use]
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = (!transition.is_zero()).then_some(transition);
        self
    }

    /// Action identifier of this command for `device_id`.
    #[must_use]
    pub fn action_id(&self, device_id: &str) -> String {
        format!("homey:device:{device_id}:{}", self.kind.action())
    }
}
