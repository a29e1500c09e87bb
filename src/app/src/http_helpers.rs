//! HTTP helper functions for Crux Core
//!
//! Device routes, URL construction and response handling shared by the
//! request macros.

use crux_http::Response;

use crate::types::{ActuatorPosition, OutputState};

/// The device speaks plain HTTP only
pub const DEVICE_SCHEME: &str = "http";

pub const STATUS_ROUTE: &str = "/status";

/// Constructs the full device URL from an address and a route.
///
/// The address is used verbatim. `crux_http` only accepts absolute URLs, so
/// an address that does not form one is reported as an error instead of
/// being sent.
///
/// # Example
/// ```
/// use esp32_panel_core::http_helpers::build_device_url;
/// let url = build_device_url("192.168.1.50", "/status").unwrap();
/// assert_eq!(url, "http://192.168.1.50/status");
/// ```
pub fn build_device_url(address: &str, route: &str) -> Result<String, String> {
    // URL parsing skips surplus slashes, so "http:///status" would name host "status"
    if address.trim().is_empty() {
        return Err("Invalid device address: empty".to_string());
    }

    let raw = format!("{DEVICE_SCHEME}://{address}{route}");
    match url::Url::parse(&raw) {
        Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => Ok(url.into()),
        Ok(_) => Err(format!("Invalid device address '{address}': missing host")),
        Err(e) => Err(format!("Invalid device address '{address}': {e}")),
    }
}

/// Route switching a single output, e.g. `/LED3=ON`
pub fn output_route(index: u8, state: OutputState) -> String {
    format!("/LED{index}={}", state.as_command())
}

/// Route switching all outputs at once, e.g. `/ALLLEDS=OFF`
pub fn all_outputs_route(state: OutputState) -> String {
    format!("/ALLLEDS={}", state.as_command())
}

/// Route moving the actuator, e.g. `/SERVO=OPEN`
pub fn actuator_route(position: ActuatorPosition) -> String {
    format!("/SERVO={}", position.as_command())
}

/// Validates HTTP response.
///
/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts error message from HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if !body.is_empty() => match String::from_utf8(body) {
            Ok(msg) => format!("{action} failed: HTTP {status}: {msg}"),
            Err(e) => format!("{action} failed: HTTP {status} (Invalid UTF-8: {e})"),
        },
        Some(_) => format!("{action} failed: HTTP {status} (Empty body)"),
        None => format!("{action} failed: HTTP {status} (No body)"),
    }
}

/// Parse JSON from response body.
///
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => {
            serde_json::from_slice(&body).map_err(|e| format!("{action}: JSON parse error: {e}"))
        }
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Check response status only (no body parsing).
///
/// Device command routes answer with an arbitrary body.
pub fn check_response_status(action: &str, response: &mut Response<Vec<u8>>) -> Result<(), String> {
    if is_response_success(response) {
        Ok(())
    } else {
        Err(extract_error_message(action, response))
    }
}

/// Describe a transport-level failure
pub fn map_http_error(action: &str, error: crux_http::HttpError) -> String {
    format!("{action} failed: {error}")
}

/// Process HTTP response result and check status only (no JSON parsing)
pub fn process_status_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<(), String> {
    match result {
        Ok(mut response) => check_response_status(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

// Response handling is exercised through the command tests in `update`, since
// crux_http::Response has no public constructor.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_from_ip_address() {
        assert_eq!(
            build_device_url("192.168.1.50", "/status"),
            Ok("http://192.168.1.50/status".to_string())
        );
    }

    #[test]
    fn builds_url_from_hostname_with_port() {
        assert_eq!(
            build_device_url("esp32.local:8080", "/LED1=ON"),
            Ok("http://esp32.local:8080/LED1=ON".to_string())
        );
    }

    #[test]
    fn rejects_empty_address() {
        assert!(build_device_url("", "/status").is_err());
    }

    #[test]
    fn rejects_address_with_invalid_port() {
        assert!(build_device_url("esp32.local:notaport", "/status").is_err());
    }

    #[test]
    fn command_routes_use_uppercase_values() {
        assert_eq!(output_route(3, OutputState::On), "/LED3=ON");
        assert_eq!(output_route(2, OutputState::Off), "/LED2=OFF");
        assert_eq!(all_outputs_route(OutputState::On), "/ALLLEDS=ON");
        assert_eq!(actuator_route(ActuatorPosition::Open), "/SERVO=OPEN");
        assert_eq!(actuator_route(ActuatorPosition::Close), "/SERVO=CLOSE");
    }
}
