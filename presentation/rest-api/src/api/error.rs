use poem::http::StatusCode;
use poem_openapi::{Object, payload::Json};

/// Error body shared by every endpoint.
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error kind, e.g. `ValidationError` or `InsufficientStock`
    pub name: String,
    pub message: String,
}

/// Maps a domain error to its HTTP status and body.
pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}
