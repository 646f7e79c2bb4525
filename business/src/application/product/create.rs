use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::create::{CreateProductParams, CreateProductUseCase};

pub struct CreateProductUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl CreateProductUseCase for CreateProductUseCaseImpl {
    async fn execute(&self, params: CreateProductParams) -> Result<Product, ProductError> {
        self.logger.info(&format!(
            "Creating product: {} with {} variants",
            params.name,
            params.variants.len()
        ));

        let mut repository = self.unit_of_work.begin().await?;
        let product = repository.create(params).await?;
        repository.commit().await?;

        self.logger
            .info(&format!("Product created with id: {}", product.id));
        Ok(product)
    }
}
