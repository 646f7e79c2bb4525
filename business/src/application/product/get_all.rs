use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::get_all::GetAllProductsUseCase;

pub struct GetAllProductsUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetAllProductsUseCase for GetAllProductsUseCaseImpl {
    async fn execute(&self) -> Result<Vec<Product>, ProductError> {
        self.logger.info("Fetching all products");

        let mut repository = self.unit_of_work.begin().await?;
        let products = repository.find_all().await?;
        repository.commit().await?;

        self.logger
            .info(&format!("Found {} products", products.len()));
        Ok(products)
    }
}
