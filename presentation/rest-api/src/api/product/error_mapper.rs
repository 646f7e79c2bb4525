use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::product::errors::ProductError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for ProductError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            ProductError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "ValidationError", message.clone())
            }
            ProductError::InvalidEnumValue(error) => {
                (StatusCode::BAD_REQUEST, "InvalidEnumValue", error.to_string())
            }
            ProductError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("Product not found with ID: {id}"),
            ),
            ProductError::VariantNotFound(id) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("Product variant not found with ID: {id}"),
            ),
            ProductError::InsufficientStock {
                variant_id,
                available,
                requested,
            } => (
                StatusCode::PRECONDITION_FAILED,
                "InsufficientStock",
                format!(
                    "Insufficient stock for product variant ID: {variant_id} \
                     (available {available}, requested {requested})"
                ),
            ),
            ProductError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "repository.persistence".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                name: name.to_string(),
                message,
            }),
        )
    }
}
