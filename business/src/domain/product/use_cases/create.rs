use async_trait::async_trait;

use crate::domain::product::dto::ProductCreateDto;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;

pub type CreateProductParams = ProductCreateDto;

#[async_trait]
pub trait CreateProductUseCase: Send + Sync {
    async fn execute(&self, params: CreateProductParams) -> Result<Product, ProductError>;
}
