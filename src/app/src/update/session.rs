use crux_core::{render::render, Command};

use crate::device_get;
use crate::events::{Event, SessionEvent};
use crate::http_helpers::STATUS_ROUTE;
use crate::model::Model;
use crate::types::DeviceStatus;
use crate::Effect;

use super::polling::{arm_reconnect_timer, cancel_timer, start_polling};

/// Shown for every failed status fetch, whatever the cause
pub const CONNECTION_ERROR: &str = "Failed to connect to the ESP32";

/// Handle session events (address, status fetch, timings)
pub fn handle(event: SessionEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        SessionEvent::SetDeviceAddress { address } => {
            log::info!("device address set to '{address}'");
            model.device_address = address;
            start_polling(model)
        }

        SessionEvent::FetchStatus => fetch_status(model),

        SessionEvent::SetTimings(timings) => match timings.validate() {
            Ok(()) => {
                model.timings = timings;
                Command::done()
            }
            Err(e) => model.set_error_and_render(e),
        },

        SessionEvent::StatusResponse(result) => handle_status_response(result, model),
    }
}

/// Read the full device status from the current address
pub fn fetch_status(model: &mut Model) -> Command<Effect, Event> {
    device_get!(Session, SessionEvent, model, STATUS_ROUTE, StatusResponse, "Fetch status",
        expect_json: DeviceStatus
    )
}

/// Apply a status fetch result and drive the connectivity state machine
pub fn handle_status_response(
    result: Result<DeviceStatus, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    model.finish_request();
    let was_connected = model.is_connected;

    match result {
        Ok(status) => {
            model.status = status;
            model.clear_error();
            model.is_connected = true;

            if !was_connected {
                log::info!("connected to {}", model.device_address);
            }

            match model.reconnect_timer.take() {
                Some(id) => Command::all([render(), cancel_timer(id)]),
                None => render(),
            }
        }
        Err(e) => {
            log::warn!("status fetch from {} failed: {e}", model.device_address);
            model.set_error(CONNECTION_ERROR.to_string());
            model.is_connected = false;

            if was_connected {
                log::info!("lost connection to {}", model.device_address);
                Command::all([render(), arm_reconnect_timer(model)])
            } else {
                render()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutputState, TimerId};

    fn all_on() -> DeviceStatus {
        DeviceStatus {
            led1: OutputState::On,
            led2: OutputState::On,
            led3: OutputState::On,
            led4: OutputState::On,
            led5: OutputState::On,
            servo: 40,
        }
    }

    mod status_response {
        use super::*;

        #[test]
        fn success_replaces_status_and_connects() {
            let mut model = Model {
                in_flight: 1,
                is_loading: true,
                error_message: Some(CONNECTION_ERROR.to_string()),
                ..Default::default()
            };

            let _ = handle_status_response(Ok(all_on()), &mut model);

            assert_eq!(model.status, all_on());
            assert!(model.is_connected);
            assert!(!model.is_loading);
            assert_eq!(model.error_message, None);
        }

        #[test]
        fn repeated_success_is_idempotent() {
            let mut model = Model::default();

            let _ = handle_status_response(Ok(all_on()), &mut model);
            let after_first = model.clone();
            let _ = handle_status_response(Ok(all_on()), &mut model);

            assert_eq!(model, after_first);
        }

        #[test]
        fn failure_disconnects_and_keeps_last_status() {
            let mut model = Model {
                status: all_on(),
                is_connected: true,
                in_flight: 1,
                is_loading: true,
                ..Default::default()
            };

            let _ = handle_status_response(Err("connection refused".to_string()), &mut model);

            assert!(!model.is_connected);
            assert!(!model.is_loading);
            assert_eq!(model.status, all_on());
            assert_eq!(model.error_message.as_deref(), Some(CONNECTION_ERROR));
        }

        #[test]
        fn losing_connection_arms_reconnect_timer() {
            let mut model = Model {
                is_connected: true,
                ..Default::default()
            };

            let _ = handle_status_response(Err("timeout".to_string()), &mut model);

            assert!(model.reconnect_timer.is_some());
        }

        #[test]
        fn failing_while_disconnected_does_not_rearm_reconnect_timer() {
            let mut model = Model::default();

            let _ = handle_status_response(Err("timeout".to_string()), &mut model);

            assert_eq!(model.reconnect_timer, None);
        }

        #[test]
        fn reconnecting_clears_pending_reconnect_timer() {
            let mut model = Model {
                reconnect_timer: Some(TimerId(7)),
                ..Default::default()
            };

            let _ = handle_status_response(Ok(DeviceStatus::default()), &mut model);

            assert_eq!(model.reconnect_timer, None);
            assert!(model.is_connected);
        }
    }

    mod session_events {
        use super::*;
        use crate::types::Timings;

        #[test]
        fn fetch_status_marks_request_in_flight() {
            let mut model = Model::default();

            let _ = handle(SessionEvent::FetchStatus, &mut model);

            assert!(model.is_loading);
            assert_eq!(model.in_flight, 1);
        }

        #[test]
        fn set_address_stores_address_verbatim() {
            let mut model = Model::default();

            let _ = handle(
                SessionEvent::SetDeviceAddress {
                    address: "192.168.1.50".to_string(),
                },
                &mut model,
            );

            assert_eq!(model.device_address, "192.168.1.50");
            assert!(model.poll_timer.is_some());
        }

        #[test]
        fn set_timings_accepts_valid_values() {
            let mut model = Model::default();
            let timings = Timings {
                poll_interval_ms: 1_000,
                reconnect_delay_ms: 500,
            };

            let _ = handle(SessionEvent::SetTimings(timings), &mut model);

            assert_eq!(model.timings, timings);
            assert_eq!(model.error_message, None);
        }

        #[test]
        fn set_timings_rejects_zero_interval() {
            let mut model = Model::default();

            let _ = handle(
                SessionEvent::SetTimings(Timings {
                    poll_interval_ms: 0,
                    reconnect_delay_ms: 500,
                }),
                &mut model,
            );

            assert_eq!(model.timings, Timings::default());
            assert!(model.error_message.is_some());
        }
    }
}
