use super::value_objects::{Season, Size};

/// Input for creating a whole product tree in one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCreateDto {
    pub name: String,
    pub description: Option<String>,
    pub season: Season,
    pub variants: Vec<ProductVariantCreateDto>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariantCreateDto {
    pub price: f64,
    pub stock: i32,
    pub color: String,
    pub size: Size,
    pub base64_images: Vec<String>,
}

/// Outcome of a delete. A missing product is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub success: bool,
    pub message: String,
}

impl DeleteResult {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Product deleted successfully.".to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            success: false,
            message: "Product not found.".to_string(),
        }
    }
}
