//! HTTP helper functions for the portal core
//!
//! Common response handling for the device's settings endpoints, kept out of
//! the macros so it can be read and debugged on its own.

use crux_http::Response;

use crate::config::encode_section_name;

/// Base URL for device requests.
///
/// NOTE: This is a dummy prefix required because `crux_http` requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// Shells strip it again: the page sends the rest relative to its own
/// origin, the native shell prepends the configured device address.
pub const BASE_URL: &str = "https://relative";

/// Path prefix of the device's settings data store
pub const DEVICE_STORE_PREFIX: &str = "/wifi-portal-ds/";

/// Resource under the data store that restarts the device
pub const RESTART_RESOURCE: &str = ".restart";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use wifi_portal_core::http_helpers::build_url;
/// let url = build_url("/wifi-portal-ds/.restart");
/// assert_eq!(url, "https://relative/wifi-portal-ds/.restart");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Settings endpoint of a section, e.g. `wifiSta` -> `/wifi-portal-ds/wifi-sta`
pub fn section_endpoint(section: &str) -> String {
    format!("{DEVICE_STORE_PREFIX}{}", encode_section_name(section))
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts error message from HTTP response, always naming the status.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if !body.is_empty() => match String::from_utf8(body) {
            Ok(msg) => format!("{action} failed: HTTP {status}: {}", msg.trim()),
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
/// The device answers uploads with advisory text, which is ignored on success.
pub fn check_response_status(action: &str, response: &mut Response<Vec<u8>>) -> Result<(), String> {
    if is_response_success(response) {
        Ok(())
    } else {
        Err(extract_error_message(action, response))
    }
}

/// Describe a request that never produced a response (unreachable, timeout)
pub fn map_http_error(action: &str, error: impl std::fmt::Display) -> String {
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
