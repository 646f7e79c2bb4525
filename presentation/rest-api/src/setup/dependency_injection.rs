use std::sync::Arc;

use logger::TracingLogger;
use persistence::product::memory::InMemoryProductStore;
use persistence::product::repository::PostgresProductStore;

use business::application::product::create::CreateProductUseCaseImpl;
use business::application::product::decrease_stock::DecreaseStockUseCaseImpl;
use business::application::product::delete::DeleteProductUseCaseImpl;
use business::application::product::get_all::GetAllProductsUseCaseImpl;
use business::application::product::get_by_id::GetProductByIdUseCaseImpl;
use business::application::product::update::UpdateProductUseCaseImpl;
use business::domain::logger::Logger;
use business::domain::product::repository::ProductUnitOfWork;

use crate::config::database_config::{self, StorageBackend};

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub product_api: crate::api::product::routes::ProductApi,
}

impl DependencyContainer {
    /// Opens the configured storage and wires every use case against it.
    pub async fn new(storage: StorageBackend) -> anyhow::Result<Self> {
        let unit_of_work: Arc<dyn ProductUnitOfWork> = match storage {
            StorageBackend::Postgres => {
                let pool = database_config::init_database().await?;
                Arc::new(PostgresProductStore::new(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; the catalog is lost on shutdown");
                Arc::new(InMemoryProductStore::new())
            }
        };

        Ok(Self::with_store(unit_of_work, storage.as_str()))
    }

    pub fn with_store(unit_of_work: Arc<dyn ProductUnitOfWork>, storage: &'static str) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

        let health_api = crate::api::health::routes::Api::new(storage);

        let create_use_case = Arc::new(CreateProductUseCaseImpl {
            unit_of_work: unit_of_work.clone(),
            logger: logger.clone(),
        });
        let get_all_use_case = Arc::new(GetAllProductsUseCaseImpl {
            unit_of_work: unit_of_work.clone(),
            logger: logger.clone(),
        });
        let get_by_id_use_case = Arc::new(GetProductByIdUseCaseImpl {
            unit_of_work: unit_of_work.clone(),
            logger: logger.clone(),
        });
        let update_use_case = Arc::new(UpdateProductUseCaseImpl {
            unit_of_work: unit_of_work.clone(),
            logger: logger.clone(),
        });
        let delete_use_case = Arc::new(DeleteProductUseCaseImpl {
            unit_of_work: unit_of_work.clone(),
            logger: logger.clone(),
        });
        let decrease_stock_use_case = Arc::new(DecreaseStockUseCaseImpl {
            unit_of_work,
            logger,
        });

        let product_api = crate::api::product::routes::ProductApi::new(
            create_use_case,
            get_all_use_case,
            get_by_id_use_case,
            update_use_case,
            delete_use_case,
            decrease_stock_use_case,
        );

        Self {
            health_api,
            product_api,
        }
    }
}
