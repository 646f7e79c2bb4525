use async_trait::async_trait;

use crate::domain::product::dto::DeleteResult;
use crate::domain::product::errors::ProductError;

pub struct DeleteProductParams {
    pub id: i64,
}

#[async_trait]
pub trait DeleteProductUseCase: Send + Sync {
    async fn execute(&self, params: DeleteProductParams) -> Result<DeleteResult, ProductError>;
}
