use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::update::{UpdateProductParams, UpdateProductUseCase};

pub struct UpdateProductUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl UpdateProductUseCase for UpdateProductUseCaseImpl {
    async fn execute(&self, params: UpdateProductParams) -> Result<Product, ProductError> {
        let product = params.product;
        self.logger.info(&format!(
            "Updating product: {} (replacing subtree with {} variants)",
            product.id,
            product.variants.len()
        ));

        let mut repository = self.unit_of_work.begin().await?;
        let updated = repository.update(&product).await?;
        repository.commit().await?;

        self.logger.info(&format!("Product updated: {}", updated.id));
        Ok(updated)
    }
}
