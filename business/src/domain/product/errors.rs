use crate::domain::errors::RepositoryError;

use super::value_objects::InvalidEnumValue;

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Malformed or missing input; the message names the offending field.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),
    #[error("product.not_found")]
    NotFound(i64),
    #[error("product.variant_not_found")]
    VariantNotFound(i64),
    #[error("product.insufficient_stock")]
    InsufficientStock {
        variant_id: i64,
        available: i32,
        requested: i32,
    },
    #[error("repository.persistence")]
    Internal(#[source] RepositoryError),
}

impl ProductError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProductError::Validation(message.into())
    }
}

impl From<RepositoryError> for ProductError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ProductNotFound(id) => ProductError::NotFound(id),
            RepositoryError::VariantNotFound(id) => ProductError::VariantNotFound(id),
            RepositoryError::InsufficientStock {
                variant_id,
                available,
                requested,
            } => ProductError::InsufficientStock {
                variant_id,
                available,
                requested,
            },
            RepositoryError::InvalidQuantity { .. } => {
                ProductError::validation("Quantity must be greater than zero.")
            }
            other => ProductError::Internal(other),
        }
    }
}
