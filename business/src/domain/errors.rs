/// Repository errors for domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository.product_not_found")]
    ProductNotFound(i64),
    #[error("repository.variant_not_found")]
    VariantNotFound(i64),
    #[error("repository.insufficient_stock")]
    InsufficientStock {
        variant_id: i64,
        available: i32,
        requested: i32,
    },
    #[error("repository.invalid_quantity")]
    InvalidQuantity { variant_id: i64, quantity: i32 },
    #[error("repository.database_error")]
    DatabaseError,
}

impl RepositoryError {
    pub fn product_not_found(id: i64) -> Self {
        RepositoryError::ProductNotFound(id)
    }
    pub fn variant_not_found(id: i64) -> Self {
        RepositoryError::VariantNotFound(id)
    }
    pub fn database_error() -> Self {
        RepositoryError::DatabaseError
    }
}
