//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map errors to HTTP status errors with a logged or surfaced context line.
pub(crate) trait ResultExt<T> {
    /// Client error: the context becomes the response message.
    fn or_400(self, context: &str) -> Result<T, StatusError>;

    /// Server error: the context is logged, not leaked.
    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_400(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|_ignored| StatusError::bad_request().brief(context))
    }

    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }
}
