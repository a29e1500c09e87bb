use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerOutput;
use crate::types::*;

/// Session events (device address, status polling, timings)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SetDeviceAddress {
        address: String,
    },
    FetchStatus,
    SetTimings(Timings),
    #[serde(skip)]
    StatusResponse(Result<DeviceStatus, String>),
}

/// Device control events (outputs and actuator)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SetOutput {
        index: u8,
        state: OutputState,
    },
    SetAllOutputs {
        state: OutputState,
    },
    SetActuator {
        position: ActuatorPosition,
    },
    #[serde(skip)]
    SetOutputResponse(Result<(), String>),
    #[serde(skip)]
    SetAllOutputsResponse(Result<(), String>),
    #[serde(skip)]
    SetActuatorResponse(Result<(), String>),
}

/// Timer events, resolved by the shell
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Elapsed(TimerId),
    Cancelled(TimerId),
}

impl From<TimerOutput> for TimerEvent {
    fn from(output: TimerOutput) -> Self {
        match output {
            TimerOutput::Elapsed { id } => Self::Elapsed(id),
            TimerOutput::Cancelled { id } => Self::Cancelled(id),
        }
    }
}

/// UI-specific events
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
}

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    Initialize,
    Session(SessionEvent),
    Control(ControlEvent),
    Timer(TimerEvent),
    Ui(UiEvent),
}
