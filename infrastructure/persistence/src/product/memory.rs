use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use business::domain::errors::RepositoryError;
use business::domain::product::dto::{DeleteResult, ProductCreateDto};
use business::domain::product::model::{Product, ProductVariant};
use business::domain::product::repository::{ProductRepository, ProductUnitOfWork};

use super::entity::{
    ProductEntity, ProductImageEntity, ProductVariantEntity, RetainedIds, assemble,
    price_to_decimal,
};

/// Row storage keyed by generated id, one arena per aggregate level.
#[derive(Debug, Clone, Default)]
struct Tables {
    products: BTreeMap<i64, ProductEntity>,
    variants: BTreeMap<i64, ProductVariantEntity>,
    images: BTreeMap<i64, ProductImageEntity>,
    last_product_id: i64,
    last_variant_id: i64,
    last_image_id: i64,
}

impl Tables {
    fn next_product_id(&mut self) -> i64 {
        self.last_product_id += 1;
        self.last_product_id
    }

    fn next_variant_id(&mut self) -> i64 {
        self.last_variant_id += 1;
        self.last_variant_id
    }

    fn next_image_id(&mut self) -> i64 {
        self.last_image_id += 1;
        self.last_image_id
    }

    fn variant_ids_of(&self, product_id: i64) -> Vec<i64> {
        self.variants
            .values()
            .filter(|v| v.product_id == product_id)
            .map(|v| v.id)
            .collect()
    }

    fn image_ids_of(&self, variant_ids: &HashSet<i64>) -> Vec<i64> {
        self.images
            .values()
            .filter(|i| variant_ids.contains(&i.product_variant_id))
            .map(|i| i.id)
            .collect()
    }

    /// Removes every variant of the product and, with them, their images.
    fn delete_subtree(&mut self, product_id: i64) {
        let variant_ids: HashSet<i64> = self.variant_ids_of(product_id).into_iter().collect();
        self.images
            .retain(|_, image| !variant_ids.contains(&image.product_variant_id));
        self.variants.retain(|_, variant| variant.product_id != product_id);
    }

    fn load(&self, product_ids: &[i64]) -> Result<Vec<Product>, RepositoryError> {
        let wanted: HashSet<i64> = product_ids.iter().copied().collect();
        let products: Vec<ProductEntity> = product_ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect();
        let variants: Vec<ProductVariantEntity> = self
            .variants
            .values()
            .filter(|v| wanted.contains(&v.product_id))
            .cloned()
            .collect();
        let variant_ids: HashSet<i64> = variants.iter().map(|v| v.id).collect();
        let images: Vec<ProductImageEntity> = self
            .images
            .values()
            .filter(|i| variant_ids.contains(&i.product_variant_id))
            .cloned()
            .collect();

        assemble(products, variants, images)
    }

    fn load_one(&self, product_id: i64) -> Result<Product, RepositoryError> {
        self.load(&[product_id])?
            .pop()
            .ok_or(RepositoryError::ProductNotFound(product_id))
    }

    fn insert_variant(
        &mut self,
        product_id: i64,
        variant: &ProductVariant,
        retained_variants: &mut RetainedIds,
        retained_images: &mut RetainedIds,
    ) -> Result<(), RepositoryError> {
        let variant_id = match retained_variants.claim(variant.id) {
            Some(id) => id,
            None => self.next_variant_id(),
        };
        self.variants.insert(
            variant_id,
            ProductVariantEntity {
                id: variant_id,
                product_id,
                price: price_to_decimal(variant.price)?,
                stock: variant.stock,
                color: variant.color.clone(),
                size: variant.size.to_string(),
            },
        );

        for image in &variant.images {
            let image_id = match retained_images.claim(image.id) {
                Some(id) => id,
                None => self.next_image_id(),
            };
            self.images.insert(
                image_id,
                ProductImageEntity {
                    id: image_id,
                    product_variant_id: variant_id,
                    base64_data: image.base64_data.clone(),
                },
            );
        }
        Ok(())
    }
}

/// In-process product storage with the same transactional semantics as the
/// PostgreSQL adapter.
///
/// Transactions are fully serialized: `begin` waits for the previous scope to
/// finish, works on a private copy of the tables and publishes it on commit.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows per level: products, variants, images.
    pub async fn row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().await;
        (
            tables.products.len(),
            tables.variants.len(),
            tables.images.len(),
        )
    }
}

#[async_trait]
impl ProductUnitOfWork for InMemoryProductStore {
    async fn begin(&self) -> Result<Box<dyn ProductRepository>, RepositoryError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(InMemoryProductRepository { guard, working }))
    }
}

pub struct InMemoryProductRepository {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&mut self, id: i64) -> Result<Product, RepositoryError> {
        self.working.load_one(id)
    }

    async fn find_all(&mut self) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<i64> = self.working.products.keys().copied().collect();
        self.working.load(&ids)
    }

    async fn create(&mut self, dto: ProductCreateDto) -> Result<Product, RepositoryError> {
        let tables = &mut self.working;
        let product_id = tables.next_product_id();
        tables.products.insert(
            product_id,
            ProductEntity {
                id: product_id,
                name: dto.name,
                description: dto.description,
                season: dto.season.to_string(),
            },
        );

        for variant in dto.variants {
            let variant_id = tables.next_variant_id();
            tables.variants.insert(
                variant_id,
                ProductVariantEntity {
                    id: variant_id,
                    product_id,
                    price: price_to_decimal(variant.price)?,
                    stock: variant.stock,
                    color: variant.color,
                    size: variant.size.to_string(),
                },
            );
            for base64_data in variant.base64_images {
                let image_id = tables.next_image_id();
                tables.images.insert(
                    image_id,
                    ProductImageEntity {
                        id: image_id,
                        product_variant_id: variant_id,
                        base64_data,
                    },
                );
            }
        }

        tables.load_one(product_id)
    }

    async fn update(&mut self, product: &Product) -> Result<Product, RepositoryError> {
        let tables = &mut self.working;
        let row = tables
            .products
            .get_mut(&product.id)
            .ok_or(RepositoryError::ProductNotFound(product.id))?;
        row.name = product.name.clone();
        row.description = product.description.clone();
        row.season = product.season.to_string();

        let previous_variants: HashSet<i64> =
            tables.variant_ids_of(product.id).into_iter().collect();
        let mut retained_images = RetainedIds::new(tables.image_ids_of(&previous_variants));
        let mut retained_variants = RetainedIds::new(previous_variants);

        tables.delete_subtree(product.id);
        for variant in &product.variants {
            tables.insert_variant(
                product.id,
                variant,
                &mut retained_variants,
                &mut retained_images,
            )?;
        }

        tables.load_one(product.id)
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<DeleteResult, RepositoryError> {
        let tables = &mut self.working;
        if tables.products.remove(&id).is_none() {
            return Ok(DeleteResult::not_found());
        }
        tables.delete_subtree(id);
        Ok(DeleteResult::deleted())
    }

    async fn decrease_stock(
        &mut self,
        variant_id: i64,
        quantity: i32,
    ) -> Result<Product, RepositoryError> {
        if quantity <= 0 {
            return Err(RepositoryError::InvalidQuantity {
                variant_id,
                quantity,
            });
        }

        let tables = &mut self.working;
        let variant = tables
            .variants
            .get_mut(&variant_id)
            .ok_or(RepositoryError::VariantNotFound(variant_id))?;

        if variant.stock < quantity {
            return Err(RepositoryError::InsufficientStock {
                variant_id,
                available: variant.stock,
                requested: quantity,
            });
        }
        variant.stock -= quantity;
        let product_id = variant.product_id;

        tables.load_one(product_id)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryProductRepository { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
