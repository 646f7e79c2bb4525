use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;

use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::product::dto::{DeleteResult, ProductCreateDto};
use crate::domain::product::model::{Product, ProductImage, ProductVariant};
use crate::domain::product::repository::{ProductRepository, ProductUnitOfWork};
use crate::domain::product::value_objects::{Season, Size};

mock! {
    pub Store {}

    #[async_trait]
    impl ProductUnitOfWork for Store {
        async fn begin(&self) -> Result<Box<dyn ProductRepository>, RepositoryError>;
    }
}

mock! {
    pub Log {}

    impl Logger for Log {
        fn info(&self, message: &str);
        fn warn(&self, message: &str);
        fn error(&self, message: &str);
        fn debug(&self, message: &str);
    }
}

pub fn mock_logger() -> Arc<dyn Logger> {
    let mut logger = MockLog::new();
    logger.expect_info().returning(|_| ());
    logger.expect_warn().returning(|_| ());
    logger.expect_error().returning(|_| ());
    logger.expect_debug().returning(|_| ());
    Arc::new(logger)
}

/// What every call on a [`StubRepository`] answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Product(Product),
    Products(Vec<Product>),
    Deleted(DeleteResult),
    Fail(RepositoryError),
}

/// Transaction scope that records the calls made on it and whether it was committed.
#[derive(Clone)]
pub struct StubRepository {
    reply: Reply,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub committed: Arc<AtomicBool>,
}

impl StubRepository {
    pub fn replying(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            committed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_committed(&self) -> bool {
        self.committed.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn product(&self) -> Result<Product, RepositoryError> {
        match &self.reply {
            Reply::Product(product) => Ok(product.clone()),
            Reply::Fail(error) => Err(error.clone()),
            other => panic!("stub cannot answer a single product with {other:?}"),
        }
    }
}

#[async_trait]
impl ProductRepository for StubRepository {
    async fn find_by_id(&mut self, id: i64) -> Result<Product, RepositoryError> {
        self.record(format!("find_by_id({id})"));
        self.product()
    }

    async fn find_all(&mut self) -> Result<Vec<Product>, RepositoryError> {
        self.record("find_all".to_string());
        match &self.reply {
            Reply::Products(products) => Ok(products.clone()),
            Reply::Fail(error) => Err(error.clone()),
            other => panic!("stub cannot answer a product list with {other:?}"),
        }
    }

    async fn create(&mut self, dto: ProductCreateDto) -> Result<Product, RepositoryError> {
        self.record(format!("create({})", dto.name));
        self.product()
    }

    async fn update(&mut self, product: &Product) -> Result<Product, RepositoryError> {
        self.record(format!("update({})", product.id));
        self.product()
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<DeleteResult, RepositoryError> {
        self.record(format!("delete_by_id({id})"));
        match &self.reply {
            Reply::Deleted(result) => Ok(result.clone()),
            Reply::Fail(error) => Err(error.clone()),
            other => panic!("stub cannot answer a delete with {other:?}"),
        }
    }

    async fn decrease_stock(
        &mut self,
        variant_id: i64,
        quantity: i32,
    ) -> Result<Product, RepositoryError> {
        self.record(format!("decrease_stock({variant_id}, {quantity})"));
        self.product()
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.committed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Store whose single transaction is the given stub.
pub fn store_with(stub: &StubRepository) -> Arc<dyn ProductUnitOfWork> {
    let stub = stub.clone();
    let mut store = MockStore::new();
    store
        .expect_begin()
        .times(1)
        .returning(move || Ok(Box::new(stub.clone())));
    Arc::new(store)
}

/// Store that cannot open a transaction at all.
pub fn unavailable_store() -> Arc<dyn ProductUnitOfWork> {
    let mut store = MockStore::new();
    store
        .expect_begin()
        .returning(|| Err(RepositoryError::DatabaseError));
    Arc::new(store)
}

pub fn jacket(product_id: i64, variant_id: i64, stock: i32) -> Product {
    Product {
        id: product_id,
        name: "Jacket".to_string(),
        description: Some("Insulated winter jacket".to_string()),
        season: Season::Winter,
        variants: vec![ProductVariant {
            id: variant_id,
            price: 49.99,
            stock,
            color: "black".to_string(),
            size: Size::M,
            images: vec![ProductImage {
                id: 1,
                base64_data: "base64A".to_string(),
            }],
        }],
    }
}
