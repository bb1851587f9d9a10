//! C ABI for the fire-spread prediction engine
//!
//! JSON in, JSON out. Every entry point returns a [`FirePredictErrorCode`]; on failure the
//! message is kept per thread and can be read with `fire_predict_get_last_error`.
//! Strings returned by the library must be released with `fire_predict_string_free`.

mod analysis;
mod error;
mod helpers;

pub use analysis::{fire_predict_analyze, fire_predict_analyze_with_config, fire_predict_string_free};
pub use error::{fire_predict_get_last_error, fire_predict_get_last_error_code, FirePredictErrorCode};
