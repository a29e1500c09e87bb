use crux_core::Command;

use crate::events::{ControlEvent, Event};
use crate::http_helpers::{actuator_route, all_outputs_route, output_route};
use crate::model::Model;
use crate::types::validate_output_index;
use crate::Effect;
use crate::{device_get, handle_command_response};

pub const OUTPUT_ERROR: &str = "Failed to control the LED";
pub const ALL_OUTPUTS_ERROR: &str = "Failed to control all LEDs";
pub const ACTUATOR_ERROR: &str = "Failed to control the servo";

/// Handle output and actuator commands.
///
/// Every command is fire-then-resync: the command response carries no state,
/// a successful command triggers a status fetch and the mirror is only ever
/// updated from `/status`.
pub fn handle(event: ControlEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ControlEvent::SetOutput { index, state } => match validate_output_index(index) {
            Ok(index) => device_get!(
                Control,
                ControlEvent,
                model,
                output_route(index, state),
                SetOutputResponse,
                "Set output"
            ),
            Err(e) => model.set_error_and_render(e),
        },

        ControlEvent::SetAllOutputs { state } => device_get!(
            Control,
            ControlEvent,
            model,
            all_outputs_route(state),
            SetAllOutputsResponse,
            "Set all outputs"
        ),

        ControlEvent::SetActuator { position } => device_get!(
            Control,
            ControlEvent,
            model,
            actuator_route(position),
            SetActuatorResponse,
            "Set actuator"
        ),

        ControlEvent::SetOutputResponse(result) => {
            handle_command_response!(model, result, OUTPUT_ERROR)
        }

        ControlEvent::SetAllOutputsResponse(result) => {
            handle_command_response!(model, result, ALL_OUTPUTS_ERROR)
        }

        ControlEvent::SetActuatorResponse(result) => {
            handle_command_response!(model, result, ACTUATOR_ERROR)
        }
    }
}
