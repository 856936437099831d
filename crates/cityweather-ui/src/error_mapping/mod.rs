//! Maps domain crate errors to cityweather_core::AppError for logging.

mod catalog;
mod weather;

use cityweather_core::AppError;

/// Conversion into the application error taxonomy.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

/// Log a swallowed fetch failure with both the technical and the short message.
pub fn log_fetch_failure(context: &str, error: impl IntoAppError) {
    let err = error.into_app_error();
    let kind = if matches!(err, AppError::Parse(_)) { "parse" } else { "network" };
    tracing::error!(
        kind,
        hint = err.user_message(),
        "{}: {}",
        context,
        err
    );
}
