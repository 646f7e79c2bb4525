use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::dto::{DeleteResult, ProductCreateDto};
use super::model::Product;

/// Opens transaction scopes over product storage.
#[async_trait]
pub trait ProductUnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ProductRepository>, RepositoryError>;
}

/// Persistence operations over the product aggregate, bound to one transaction.
///
/// Writes become visible to other scopes only after [`ProductRepository::commit`].
/// Dropping a scope without committing rolls back everything it wrote.
#[async_trait]
pub trait ProductRepository: Send {
    async fn find_by_id(&mut self, id: i64) -> Result<Product, RepositoryError>;

    /// Returns the full catalog ordered by product id.
    async fn find_all(&mut self) -> Result<Vec<Product>, RepositoryError>;

    /// Persists the product with all its variants and images and returns the
    /// stored tree with every id assigned.
    async fn create(&mut self, dto: ProductCreateDto) -> Result<Product, RepositoryError>;

    /// Overwrites the product's scalar fields and replaces its entire
    /// variant/image subtree with the one in `product`.
    ///
    /// Variants or images left out of `product` are deleted. Supplied ids that
    /// belonged to this product's previous subtree are kept; any other id is
    /// ignored and a fresh one is assigned.
    async fn update(&mut self, product: &Product) -> Result<Product, RepositoryError>;

    /// Deletes the product and, transitively, its variants and images.
    async fn delete_by_id(&mut self, id: i64) -> Result<DeleteResult, RepositoryError>;

    /// Subtracts `quantity` from the variant's stock and returns the owning
    /// product. Fails without writing if the stock would go negative, and with
    /// [`RepositoryError::InvalidQuantity`] if `quantity` is not positive.
    async fn decrease_stock(
        &mut self,
        variant_id: i64,
        quantity: i32,
    ) -> Result<Product, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
