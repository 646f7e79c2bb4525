use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use business::domain::errors::RepositoryError;
use business::domain::product::dto::{DeleteResult, ProductCreateDto};
use business::domain::product::model::Product;
use business::domain::product::repository::{ProductRepository, ProductUnitOfWork};
use business::domain::product::value_objects::Size;

use super::entity::{
    ProductEntity, ProductImageEntity, ProductVariantEntity, RetainedIds, assemble,
    price_to_decimal,
};

const INSERT_VARIANT: &str = r#"INSERT INTO product_variants
    (id, product_id, price, stock, color, size)
    VALUES (
        COALESCE($1, nextval(pg_get_serial_sequence('product_variants', 'id'))),
        $2, $3, $4, $5, $6
    )
    RETURNING id"#;

const INSERT_IMAGE: &str = r#"INSERT INTO product_images (id, product_variant_id, base64_data)
    VALUES (COALESCE($1, nextval(pg_get_serial_sequence('product_images', 'id'))), $2, $3)
    RETURNING id"#;

fn database_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |error| {
        tracing::error!(operation, error = %error, "Product storage failure");
        RepositoryError::DatabaseError
    }
}

/// Hands out PostgreSQL transactions over the product tables.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductUnitOfWork for PostgresProductStore {
    async fn begin(&self) -> Result<Box<dyn ProductRepository>, RepositoryError> {
        let tx = self.pool.begin().await.map_err(database_error("begin"))?;
        Ok(Box::new(PostgresProductRepository { tx }))
    }
}

/// Product repository bound to one open transaction. Dropping it rolls back.
pub struct PostgresProductRepository {
    tx: Transaction<'static, Postgres>,
}

impl PostgresProductRepository {
    async fn load(&mut self, product_ids: &[i64]) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductEntity>(
            r#"SELECT id, name, description, season FROM products
            WHERE id = ANY($1) ORDER BY id"#,
        )
        .bind(product_ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(database_error("load_products"))?;

        let variants = sqlx::query_as::<_, ProductVariantEntity>(
            r#"SELECT id, product_id, price, stock, color, size FROM product_variants
            WHERE product_id = ANY($1) ORDER BY id"#,
        )
        .bind(product_ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(database_error("load_variants"))?;

        let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
        let images = sqlx::query_as::<_, ProductImageEntity>(
            r#"SELECT id, product_variant_id, base64_data FROM product_images
            WHERE product_variant_id = ANY($1) ORDER BY id"#,
        )
        .bind(variant_ids.as_slice())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(database_error("load_images"))?;

        assemble(products, variants, images)
    }

    async fn load_one(&mut self, product_id: i64) -> Result<Product, RepositoryError> {
        self.load(&[product_id])
            .await?
            .pop()
            .ok_or(RepositoryError::ProductNotFound(product_id))
    }

    async fn insert_variant(
        &mut self,
        id: Option<i64>,
        product_id: i64,
        price: f64,
        stock: i32,
        color: &str,
        size: Size,
    ) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>(INSERT_VARIANT)
            .bind(id)
            .bind(product_id)
            .bind(price_to_decimal(price)?)
            .bind(stock)
            .bind(color)
            .bind(size.to_string())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(database_error("insert_variant"))
    }

    async fn insert_image(
        &mut self,
        id: Option<i64>,
        variant_id: i64,
        base64_data: &str,
    ) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>(INSERT_IMAGE)
            .bind(id)
            .bind(variant_id)
            .bind(base64_data)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(database_error("insert_image"))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&mut self, id: i64) -> Result<Product, RepositoryError> {
        self.load_one(id).await
    }

    async fn find_all(&mut self) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM products ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(database_error("list_product_ids"))?;

        self.load(&ids).await
    }

    async fn create(&mut self, dto: ProductCreateDto) -> Result<Product, RepositoryError> {
        let product_id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, description, season) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.season.to_string())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(database_error("insert_product"))?;

        for variant in &dto.variants {
            let variant_id = self
                .insert_variant(
                    None,
                    product_id,
                    variant.price,
                    variant.stock,
                    &variant.color,
                    variant.size,
                )
                .await?;
            for base64_data in &variant.base64_images {
                self.insert_image(None, variant_id, base64_data).await?;
            }
        }

        tracing::debug!(
            product_id,
            variants = dto.variants.len(),
            "Inserted product tree"
        );
        self.load_one(product_id).await
    }

    async fn update(&mut self, product: &Product) -> Result<Product, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(product.id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(database_error("lock_product"))?
            .ok_or(RepositoryError::ProductNotFound(product.id))?;

        sqlx::query("UPDATE products SET name = $2, description = $3, season = $4 WHERE id = $1")
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.season.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(database_error("update_product"))?;

        let previous_variants: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM product_variants WHERE product_id = $1")
                .bind(product.id)
                .fetch_all(&mut *self.tx)
                .await
                .map_err(database_error("list_variant_ids"))?;
        let previous_images: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM product_images WHERE product_variant_id = ANY($1)")
                .bind(previous_variants.as_slice())
                .fetch_all(&mut *self.tx)
                .await
                .map_err(database_error("list_image_ids"))?;

        // Images go with their variants through ON DELETE CASCADE.
        sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
            .bind(product.id)
            .execute(&mut *self.tx)
            .await
            .map_err(database_error("delete_variants"))?;

        let mut retained_variants = RetainedIds::new(previous_variants);
        let mut retained_images = RetainedIds::new(previous_images);
        for variant in &product.variants {
            let variant_id = self
                .insert_variant(
                    retained_variants.claim(variant.id),
                    product.id,
                    variant.price,
                    variant.stock,
                    &variant.color,
                    variant.size,
                )
                .await?;
            for image in &variant.images {
                self.insert_image(
                    retained_images.claim(image.id),
                    variant_id,
                    &image.base64_data,
                )
                .await?;
            }
        }

        tracing::debug!(
            product_id = product.id,
            variants = product.variants.len(),
            "Replaced product subtree"
        );
        self.load_one(product.id).await
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<DeleteResult, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(database_error("delete_product"))?;

        if result.rows_affected() == 0 {
            return Ok(DeleteResult::not_found());
        }
        tracing::debug!(product_id = id, "Deleted product tree");
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

        // The row lock holds until commit, so concurrent decrements of the same
        // variant observe each other's writes.
        let (product_id, stock): (i64, i32) = sqlx::query_as(
            "SELECT product_id, stock FROM product_variants WHERE id = $1 FOR UPDATE",
        )
        .bind(variant_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(database_error("lock_variant"))?
        .ok_or(RepositoryError::VariantNotFound(variant_id))?;

        if stock < quantity {
            return Err(RepositoryError::InsufficientStock {
                variant_id,
                available: stock,
                requested: quantity,
            });
        }

        sqlx::query("UPDATE product_variants SET stock = stock - $2 WHERE id = $1")
            .bind(variant_id)
            .bind(quantity)
            .execute(&mut *self.tx)
            .await
            .map_err(database_error("decrease_stock"))?;

        tracing::debug!(variant_id, quantity, remaining = stock - quantity, "Decreased stock");
        self.load_one(product_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await.map_err(database_error("commit"))
    }
}
