use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::get_by_id::{GetProductByIdParams, GetProductByIdUseCase};

pub struct GetProductByIdUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetProductByIdUseCase for GetProductByIdUseCaseImpl {
    async fn execute(&self, params: GetProductByIdParams) -> Result<Product, ProductError> {
        self.logger
            .info(&format!("Fetching product by id: {}", params.id));

        let mut repository = self.unit_of_work.begin().await?;
        let product = repository.find_by_id(params.id).await?;
        repository.commit().await?;

        Ok(product)
    }
}
