use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::dto::DeleteResult;
use crate::domain::product::errors::ProductError;
use crate::domain::product::repository::ProductUnitOfWork;
use crate::domain::product::use_cases::delete::{DeleteProductParams, DeleteProductUseCase};

pub struct DeleteProductUseCaseImpl {
    pub unit_of_work: Arc<dyn ProductUnitOfWork>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl DeleteProductUseCase for DeleteProductUseCaseImpl {
    async fn execute(&self, params: DeleteProductParams) -> Result<DeleteResult, ProductError> {
        self.logger
            .info(&format!("Deleting product: {}", params.id));

        let mut repository = self.unit_of_work.begin().await?;
        let result = repository.delete_by_id(params.id).await?;
        repository.commit().await?;

        if result.success {
            self.logger.info(&format!("Product deleted: {}", params.id));
        } else {
            self.logger
                .warn(&format!("Product {} not deleted: {}", params.id, result.message));
        }
        Ok(result)
    }
}
