use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::decrease_stock::{
    DecreaseStockParams, DecreaseStockUseCase,
};

pub struct DecreaseStockUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl DecreaseStockUseCase for DecreaseStockUseCaseImpl {
    async fn execute(&self, params: DecreaseStockParams) -> Result<Product, ProductError> {
        self.logger.info(&format!(
            "Decreasing stock of variant {} by {}",
            params.variant_id, params.quantity
        ));

        let mut repository = self.unit_of_work.begin().await?;
        let product = match repository
            .decrease_stock(params.variant_id, params.quantity)
            .await
        {
            Ok(product) => product,
            Err(err) => {
                let err = ProductError::from(err);
                if let ProductError::InsufficientStock { available, .. } = &err {
                    self.logger.warn(&format!(
                        "Insufficient stock for variant {}: {} available, {} requested",
                        params.variant_id, available, params.quantity
                    ));
                }
                return Err(err);
            }
        };
        repository.commit().await?;

        Ok(product)
    }
}
