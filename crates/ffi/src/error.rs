use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FirePredictError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FirePredictErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FirePredictError` for the failures this library reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFirePredictError {
    code: FirePredictErrorCode,
    msg: String,
}

impl DefaultFirePredictError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"request_json"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FirePredictErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Input C string is not valid UTF-8.
    pub fn invalid_utf8(param_name: &str, error: &std::str::Utf8Error) -> Self {
        Self {
            code: FirePredictErrorCode::InvalidUtf8,
            msg: format!("Parameter '{param_name}' is not valid UTF-8: {error}"),
        }
    }

    /// Request or config JSON could not be decoded or validated.
    pub fn invalid_request(message: impl std::fmt::Display) -> Self {
        Self {
            code: FirePredictErrorCode::InvalidRequest,
            msg: format!("Invalid request: {message}"),
        }
    }

    /// Result could not be encoded as a C string.
    pub fn serialization_failed(message: impl std::fmt::Display) -> Self {
        Self {
            code: FirePredictErrorCode::SerializationFailed,
            msg: format!("Failed to serialize result: {message}"),
        }
    }
}

impl FirePredictError for DefaultFirePredictError {
    fn code(&self) -> FirePredictErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by prediction functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePredictErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// An input string was not valid UTF-8.
    InvalidUtf8 = 2,

    /// The request (or config) JSON was malformed or failed validation.
    InvalidRequest = 3,

    /// The analysis result could not be returned as a C string.
    SerializationFailed = 4,
}

impl From<DefaultFirePredictError> for FirePredictErrorCode {
    fn from(error: DefaultFirePredictError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is owned here so the pointer handed out stays valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, FirePredictErrorCode)> = const { RefCell::new((None, FirePredictErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FirePredictErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FirePredictErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if it succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// char* result = NULL;
/// if (fire_predict_analyze(request, &result) != Ok) {
///     const char* error = fire_predict_get_last_error();
///     if (error) {
///         fprintf(stderr, "prediction failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_predict_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code on this thread.
///
/// Returns `FirePredictErrorCode::Ok` (0) if the last call succeeded.
#[no_mangle]
pub extern "C" fn fire_predict_get_last_error_code() -> FirePredictErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
