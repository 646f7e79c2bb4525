use super::value_objects::{Season, Size};

/// Root of the product aggregate.
///
/// The tree is owned top-down: a product owns its variants, each variant owns
/// its images. Ids are assigned by storage and are `0` before creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub season: Season,
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    pub id: i64,
    pub price: f64,
    pub stock: i32,
    pub color: String,
    pub size: Size,
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub id: i64,
    pub base64_data: String,
}

impl ProductVariant {
    /// Largest price the `NUMERIC(12, 2)` price column can hold.
    pub const MAX_PRICE: f64 = 9_999_999_999.99;
}

impl Product {
    pub fn variant(&self, variant_id: i64) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}
