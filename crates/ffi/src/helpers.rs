use crate::error::{with_last_error_mut, DefaultFirePredictError, FirePredictError, FirePredictErrorCode};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FirePredictError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error in thread-local storage and return its code.
#[inline]
pub(crate) fn track_error(error: &impl FirePredictError) -> FirePredictErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error side of a result, passing the success value through.
#[inline]
pub(crate) fn track_result<T>(
    result: Result<T, DefaultFirePredictError>,
) -> Result<T, FirePredictErrorCode> {
    result.map_err(|e| track_error(&e))
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FirePredictErrorCode::Ok;
    });
}

/// Borrow a C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives `'a`.
pub(crate) unsafe fn str_arg<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultFirePredictError> {
    if ptr.is_null() {
        return Err(DefaultFirePredictError::null_pointer(param_name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| DefaultFirePredictError::invalid_utf8(param_name, &e))
}
