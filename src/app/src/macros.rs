/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.error_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.is_connected, true;
///     model.error_message, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

/// Macro for GET requests against the device with standard bookkeeping.
///
/// Counts the request as in flight, renders the loading state and maps the
/// response into a domain event. The response handler must call
/// `model.finish_request()`. If the device address does not form a valid URL
/// the response event is sent straight back carrying the error, so the
/// handler sees every failure the same way.
///
/// # Patterns
///
/// Pattern 1: GET expecting status only
/// ```ignore
/// device_get!(Control, ControlEvent, model, output_route(1, OutputState::On), SetOutputResponse, "Set output")
/// ```
///
/// Pattern 2: GET expecting JSON response
/// ```ignore
/// device_get!(Session, SessionEvent, model, STATUS_ROUTE, StatusResponse, "Fetch status",
///     expect_json: DeviceStatus
/// )
/// ```
#[macro_export]
macro_rules! device_get {
    // Pattern 1: GET expecting status only
    ($domain:ident, $domain_event:ident, $model:expr, $route:expr, $response_event:ident, $action:expr) => {{
        $model.start_request();
        match $crate::build_device_url(&$model.device_address, &$route) {
            Ok(url) => {
                log::debug!("{}: GET {url}", $action);
                crux_core::Command::all([
                    crux_core::render::render(),
                    $crate::HttpCmd::get(url).build().then_send(|result| {
                        let event_result = $crate::process_status_response($action, result);
                        $crate::events::Event::$domain(
                            $crate::events::$domain_event::$response_event(event_result),
                        )
                    }),
                ])
            }
            Err(e) => crux_core::Command::event($crate::events::Event::$domain(
                $crate::events::$domain_event::$response_event(Err(e)),
            )),
        }
    }};

    // Pattern 2: GET expecting JSON response
    ($domain:ident, $domain_event:ident, $model:expr, $route:expr, $response_event:ident, $action:expr, expect_json: $response_type:ty) => {{
        $model.start_request();
        match $crate::build_device_url(&$model.device_address, &$route) {
            Ok(url) => {
                log::debug!("{}: GET {url}", $action);
                crux_core::Command::all([
                    crux_core::render::render(),
                    $crate::HttpCmd::get(url).build().then_send(|result| {
                        let event_result: Result<$response_type, String> =
                            $crate::process_json_response($action, result);
                        $crate::events::Event::$domain(
                            $crate::events::$domain_event::$response_event(event_result),
                        )
                    }),
                ])
            }
            Err(e) => crux_core::Command::event($crate::events::Event::$domain(
                $crate::events::$domain_event::$response_event(Err(e)),
            )),
        }
    }};
}

/// Macro for handling device command responses.
///
/// On success the status mirror is resynchronised; on failure the
/// operation-specific message is shown and the mirror is left untouched.
///
/// # Example
/// ```ignore
/// handle_command_response!(model, result, "Failed to control the LED")
/// ```
#[macro_export]
macro_rules! handle_command_response {
    ($model:expr, $result:expr, $failure_message:expr) => {{
        $model.finish_request();
        match $result {
            Ok(()) => $crate::update::session::fetch_status($model),
            Err(e) => {
                log::warn!("{e}");
                $model.set_error_and_render($failure_message.to_string())
            }
        }
    }};
}
