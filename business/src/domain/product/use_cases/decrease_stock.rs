use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;

#[derive(Debug)]
pub struct DecreaseStockParams {
    pub variant_id: i64,
    pub quantity: i32,
}

#[async_trait]
pub trait DecreaseStockUseCase: Send + Sync {
    async fn execute(&self, params: DecreaseStockParams) -> Result<Product, ProductError>;
}
