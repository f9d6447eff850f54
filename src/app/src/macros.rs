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
///     model.error_message, None;
///     model.success_message, None
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

// Re-export http_helpers functions for macro use
pub use crate::http_helpers::{
    build_url, check_response_status, extract_error_message, is_response_success, map_http_error,
    parse_json_response, process_json_response, process_status_response, BASE_URL,
};

/// Macro for GET requests against the device's settings store.
/// The mapper wraps the parsed result into a domain event.
///
/// NOTE: URLs are prefixed with `https://relative`.
/// `crux_http` requires absolute URLs and rejects relative paths.
/// Shells strip this prefix before sending requests.
///
/// # Example
/// ```ignore
/// device_get!(Config, "/wifi-portal-ds/wifi-sta", "Load wifiSta",
///     expect_json: ConfigTree,
///     map: move |result| ConfigEvent::SectionLoaded { section, result })
/// ```
#[macro_export]
macro_rules! device_get {
    ($domain:ident, $endpoint:expr, $action:expr, expect_json: $response_type:ty, map: $mapper:expr) => {{
        let action: String = $action.into();
        let mapper = $mapper;
        $crate::HttpCmd::get($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .build()
            .then_send(move |result| {
                let event_result: Result<$response_type, String> =
                    $crate::process_json_response(&action, result);
                $crate::events::Event::$domain(mapper(event_result))
            })
    }};
}

/// Macro for POST requests against the device's settings store, checking
/// the status only. The response body is advisory text and is ignored.
///
/// # Patterns
///
/// Pattern 1: POST without body
/// ```ignore
/// device_post!(Portal, "/wifi-portal-ds/.restart", "Restart",
///     map: PortalEvent::SaveTaskSettled)
/// ```
///
/// Pattern 2: POST with a JSON document as string body
/// ```ignore
/// device_post!(Portal, "/wifi-portal-ds/wifi-sta", "Save wifiSta",
///     body_string: document,
///     map: PortalEvent::SaveTaskSettled)
/// ```
#[macro_export]
macro_rules! device_post {
    // Pattern 1: POST without body
    ($domain:ident, $endpoint:expr, $action:expr, map: $mapper:expr) => {{
        let action: String = $action.into();
        let mapper = $mapper;
        $crate::HttpCmd::post($crate::build_url($endpoint))
            .build()
            .then_send(move |result| {
                let event_result = $crate::process_status_response(&action, result);
                $crate::events::Event::$domain(mapper(event_result))
            })
    }};

    // Pattern 2: POST with string body
    ($domain:ident, $endpoint:expr, $action:expr, body_string: $body:expr, map: $mapper:expr) => {{
        let action: String = $action.into();
        let mapper = $mapper;
        $crate::HttpCmd::post($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .body_string($body)
            .build()
            .then_send(move |result| {
                let event_result = $crate::process_status_response(&action, result);
                $crate::events::Event::$domain(mapper(event_result))
            })
    }};
}
