use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of switchable outputs on the device
pub const OUTPUT_COUNT: u8 = 5;

/// Servo position reported by a freshly flashed device
pub const DEFAULT_SERVO_POSITION: i32 = 130;

/// Binary state of a single output line
///
/// Serialized lowercase (`"on"`/`"off"`) as reported by `/status`.
/// Commands use the uppercase form, see [`OutputState::as_command`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputState {
    On,
    #[default]
    Off,
}

impl OutputState {
    /// Value used in command routes, e.g. `/LED1=ON`
    pub fn as_command(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
        }
    }
}

/// Symbolic actuator position; the device maps it to its own servo angle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorPosition {
    Open,
    Close,
}

impl ActuatorPosition {
    /// Value used in the command route, e.g. `/SERVO=OPEN`
    pub fn as_command(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
        }
    }
}

/// Full device snapshot as returned by `GET /status`
///
/// Always replaced as a whole, never patched field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceStatus {
    pub led1: OutputState,
    pub led2: OutputState,
    pub led3: OutputState,
    pub led4: OutputState,
    pub led5: OutputState,
    pub servo: i32,
}

impl Default for DeviceStatus {
    fn default() -> Self {
        Self {
            led1: OutputState::Off,
            led2: OutputState::Off,
            led3: OutputState::Off,
            led4: OutputState::Off,
            led5: OutputState::Off,
            servo: DEFAULT_SERVO_POSITION,
        }
    }
}

impl DeviceStatus {
    /// State of output `index` (1-based), `None` if out of range
    pub fn output(&self, index: u8) -> Option<OutputState> {
        match index {
            1 => Some(self.led1),
            2 => Some(self.led2),
            3 => Some(self.led3),
            4 => Some(self.led4),
            5 => Some(self.led5),
            _ => None,
        }
    }

    /// All outputs in index order
    pub fn outputs(&self) -> [OutputState; OUTPUT_COUNT as usize] {
        [self.led1, self.led2, self.led3, self.led4, self.led5]
    }
}

/// Check that `index` addresses one of the device outputs
pub fn validate_output_index(index: u8) -> Result<u8, String> {
    if (1..=OUTPUT_COUNT).contains(&index) {
        Ok(index)
    } else {
        Err(format!(
            "Invalid output index {index}: expected 1 to {OUTPUT_COUNT}"
        ))
    }
}
