use fire_predict_core::{AnalysisRequest, PredictionConfig, PredictionCoordinator};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{DefaultFirePredictError, FirePredictErrorCode};
use crate::helpers::{clear_last_error, str_arg, track_error, track_result};

// Default-config coordinator shared by every caller; it holds no mutable state
static COORDINATOR: LazyLock<PredictionCoordinator> = LazyLock::new(PredictionCoordinator::default);

fn analyze_json(
    coordinator: &PredictionCoordinator,
    request_json: &str,
) -> Result<CString, DefaultFirePredictError> {
    let request: AnalysisRequest =
        serde_json::from_str(request_json).map_err(DefaultFirePredictError::invalid_request)?;
    let outcome = coordinator.analyze_request(&request);
    let json = serde_json::to_string(&outcome).map_err(DefaultFirePredictError::serialization_failed)?;
    debug!("FFI analysis produced {} bytes", json.len());
    CString::new(json).map_err(DefaultFirePredictError::serialization_failed)
}

/// Write `result` to `out` and translate it into an error code.
///
/// # Safety
/// `out` must be non-null and valid for writes.
unsafe fn write_result(
    result: Result<CString, DefaultFirePredictError>,
    out: *mut *mut c_char,
) -> FirePredictErrorCode {
    match track_result(result) {
        Ok(json) => {
            clear_last_error();
            unsafe {
                *out = json.into_raw();
            }
            FirePredictErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out = ptr::null_mut();
            }
            code
        }
    }
}

/// Run a prediction for a JSON request with the default configuration.
///
/// The request has the shape
/// `{"type", "location": {"lat", "lon"}, "weather", "fire_perimeter", "critical_points"}`;
/// every field except `type` is optional. On success `*out_result_json` receives an
/// owned JSON string that must be released with `fire_predict_string_free`. On failure
/// it is set to null and the reason is available from `fire_predict_get_last_error`.
///
/// Unsupported disaster types are not an error: they produce a
/// `{"status": "not_implemented", ...}` result.
///
/// # Safety
/// - `request_json` must be null or a valid null-terminated string.
/// - `out_result_json` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fire_predict_analyze(
    request_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> FirePredictErrorCode {
    if out_result_json.is_null() {
        return track_error(&DefaultFirePredictError::null_pointer("out_result_json"));
    }
    let result = unsafe { str_arg(request_json, "request_json") }
        .and_then(|request| analyze_json(&COORDINATOR, request));
    unsafe { write_result(result, out_result_json) }
}

/// Like `fire_predict_analyze`, with a JSON `PredictionConfig` overriding the defaults.
///
/// Sections missing from `config_json` keep their defaults. An invalid config fails
/// with `InvalidRequest`.
///
/// # Safety
/// - `config_json` and `request_json` must be null or valid null-terminated strings.
/// - `out_result_json` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn fire_predict_analyze_with_config(
    config_json: *const c_char,
    request_json: *const c_char,
    out_result_json: *mut *mut c_char,
) -> FirePredictErrorCode {
    if out_result_json.is_null() {
        return track_error(&DefaultFirePredictError::null_pointer("out_result_json"));
    }
    let result = unsafe { str_arg(config_json, "config_json") }
        .and_then(|text| {
            PredictionConfig::from_json_str(text).map_err(DefaultFirePredictError::invalid_request)
        })
        .and_then(|config| {
            PredictionCoordinator::new(&config).map_err(DefaultFirePredictError::invalid_request)
        })
        .and_then(|coordinator| {
            let request = unsafe { str_arg(request_json, "request_json") }?;
            analyze_json(&coordinator, request)
        });
    unsafe { write_result(result, out_result_json) }
}

/// Release a string returned by this library.
///
/// Null is a no-op.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `fire_predict_analyze` /
/// `fire_predict_analyze_with_config` that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn fire_predict_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{fire_predict_get_last_error, fire_predict_get_last_error_code};
    use std::ffi::CStr;

    fn call(request: &str) -> (FirePredictErrorCode, Option<serde_json::Value>) {
        let request = CString::new(request).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { fire_predict_analyze(request.as_ptr(), &mut out) };
        if out.is_null() {
            return (code, None);
        }
        let json = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_owned();
        unsafe { fire_predict_string_free(out) };
        (code, Some(serde_json::from_str(&json).unwrap()))
    }

    #[test]
    fn test_analyze_wildfire() {
        let (code, json) = call(r#"{"type": "wildfire", "weather": {}}"#);
        assert_eq!(code, FirePredictErrorCode::Ok);
        assert_eq!(fire_predict_get_last_error_code(), FirePredictErrorCode::Ok);
        assert!(fire_predict_get_last_error().is_null());
        let json = json.unwrap();
        assert_eq!(json["current_spread_rate_kmh"], 3.44);
        assert_eq!(json["predictions"]["hour_3"]["confidence"], 0.6);
    }

    #[test]
    fn test_analyze_flood_is_not_an_error() {
        let (code, json) = call(r#"{"type": "flood"}"#);
        assert_eq!(code, FirePredictErrorCode::Ok);
        assert_eq!(json.unwrap()["status"], "not_implemented");
    }

    #[test]
    fn test_invalid_json_sets_last_error() {
        let (code, json) = call("{not json");
        assert_eq!(code, FirePredictErrorCode::InvalidRequest);
        assert!(json.is_none());
        assert_eq!(fire_predict_get_last_error_code(), FirePredictErrorCode::InvalidRequest);
        let message = unsafe { CStr::from_ptr(fire_predict_get_last_error()) };
        assert!(message.to_str().unwrap().starts_with("Invalid request"));
    }

    #[test]
    fn test_null_pointers() {
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { fire_predict_analyze(ptr::null(), &mut out) };
        assert_eq!(code, FirePredictErrorCode::NullPointer);
        assert!(out.is_null());

        let request = CString::new("{}").unwrap();
        let code = unsafe { fire_predict_analyze(request.as_ptr(), ptr::null_mut()) };
        assert_eq!(code, FirePredictErrorCode::NullPointer);

        unsafe { fire_predict_string_free(ptr::null_mut()) };
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = CString::new(vec![0xFF_u8, 0xFE]).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { fire_predict_analyze(bytes.as_ptr(), &mut out) };
        assert_eq!(code, FirePredictErrorCode::InvalidUtf8);
    }

    #[test]
    fn test_analyze_with_config() {
        let config = CString::new(r#"{"timeline": {"horizons_hours": [2]}}"#).unwrap();
        let request = CString::new(r#"{"type": "wildfire"}"#).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code =
            unsafe { fire_predict_analyze_with_config(config.as_ptr(), request.as_ptr(), &mut out) };
        assert_eq!(code, FirePredictErrorCode::Ok);
        let json: serde_json::Value =
            serde_json::from_str(unsafe { CStr::from_ptr(out) }.to_str().unwrap()).unwrap();
        unsafe { fire_predict_string_free(out) };
        assert!(json["predictions"]["hour_2"].is_object());
        assert!(json["predictions"]["hour_1"].is_null());

        let bad = CString::new(r#"{"geometry": {"km_per_degree": -1}}"#).unwrap();
        let code =
            unsafe { fire_predict_analyze_with_config(bad.as_ptr(), request.as_ptr(), &mut out) };
        assert_eq!(code, FirePredictErrorCode::InvalidRequest);
        assert!(out.is_null());
    }
}
