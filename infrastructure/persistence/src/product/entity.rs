use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};
use sqlx::FromRow;

use business::domain::errors::RepositoryError;
use business::domain::product::model::{Product, ProductImage, ProductVariant};
use business::domain::product::value_objects::{Season, Size};

/// Scale of the `price` column (`NUMERIC(12, 2)`).
const PRICE_SCALE: i64 = 2;

#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub season: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductVariantEntity {
    pub id: i64,
    pub product_id: i64,
    pub price: BigDecimal,
    pub stock: i32,
    pub color: String,
    pub size: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductImageEntity {
    pub id: i64,
    pub product_variant_id: i64,
    pub base64_data: String,
}

impl ProductEntity {
    pub fn into_domain(self, variants: Vec<ProductVariant>) -> Result<Product, RepositoryError> {
        let season = self.season.parse::<Season>().map_err(|e| {
            tracing::error!(product_id = self.id, error = %e, "Corrupt season column");
            RepositoryError::DatabaseError
        })?;

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            season,
            variants,
        })
    }
}

impl ProductVariantEntity {
    pub fn into_domain(self, images: Vec<ProductImage>) -> Result<ProductVariant, RepositoryError> {
        let size = self.size.parse::<Size>().map_err(|e| {
            tracing::error!(variant_id = self.id, error = %e, "Corrupt size column");
            RepositoryError::DatabaseError
        })?;

        Ok(ProductVariant {
            id: self.id,
            price: decimal_to_price(&self.price)?,
            stock: self.stock,
            color: self.color,
            size,
            images,
        })
    }
}

impl ProductImageEntity {
    pub fn into_domain(self) -> ProductImage {
        ProductImage {
            id: self.id,
            base64_data: self.base64_data,
        }
    }
}

/// Rounds a price to the column's scale. Prices outside
/// `0..=ProductVariant::MAX_PRICE` do not fit the column and are refused.
pub fn price_to_decimal(price: f64) -> Result<BigDecimal, RepositoryError> {
    if !(0.0..=ProductVariant::MAX_PRICE).contains(&price) {
        tracing::error!(price, "Price is outside the storable range");
        return Err(RepositoryError::DatabaseError);
    }

    BigDecimal::from_f64(price)
        .map(|d| d.round(PRICE_SCALE))
        .ok_or_else(|| {
            tracing::error!(price, "Price is not representable as a decimal");
            RepositoryError::DatabaseError
        })
}

pub fn decimal_to_price(decimal: &BigDecimal) -> Result<f64, RepositoryError> {
    decimal.to_f64().ok_or_else(|| {
        tracing::error!(%decimal, "Price is not representable as f64");
        RepositoryError::DatabaseError
    })
}

/// Joins flat rows into product trees.
///
/// Children keep the order they are given in; products are returned in the
/// order of `products`. Rows whose parent is not present are ignored.
pub fn assemble(
    products: Vec<ProductEntity>,
    variants: Vec<ProductVariantEntity>,
    images: Vec<ProductImageEntity>,
) -> Result<Vec<Product>, RepositoryError> {
    let mut images_by_variant: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    for image in images {
        images_by_variant
            .entry(image.product_variant_id)
            .or_default()
            .push(image.into_domain());
    }

    let mut variants_by_product: HashMap<i64, Vec<ProductVariant>> = HashMap::new();
    for variant in variants {
        let images = images_by_variant.remove(&variant.id).unwrap_or_default();
        let product_id = variant.product_id;
        variants_by_product
            .entry(product_id)
            .or_default()
            .push(variant.into_domain(images)?);
    }

    products
        .into_iter()
        .map(|product| {
            let variants = variants_by_product.remove(&product.id).unwrap_or_default();
            product.into_domain(variants)
        })
        .collect()
}

/// Decides which ids survive a subtree replacement.
///
/// An id supplied by the caller is kept only if it belonged to the replaced
/// subtree and has not already been claimed earlier in the same payload.
#[derive(Debug, Default)]
pub struct RetainedIds {
    available: HashSet<i64>,
}

impl RetainedIds {
    pub fn new(previous: impl IntoIterator<Item = i64>) -> Self {
        Self {
            available: previous.into_iter().collect(),
        }
    }

    pub fn claim(&mut self, supplied: i64) -> Option<i64> {
        if self.available.remove(&supplied) {
            Some(supplied)
        } else {
            None
        }
    }
}
