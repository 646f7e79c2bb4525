use poem_openapi::Object;

use business::domain::product::dto::DeleteResult;
use business::domain::product::model::{Product, ProductImage, ProductVariant};

#[derive(Debug, Clone, Object)]
pub struct CreateVariantRequest {
    /// Unit price, non-negative, stored with two decimals
    pub price: f64,
    /// Units in stock, non-negative
    pub stock: i32,
    pub color: String,
    /// One of XS, S, M, L, XL, XXL
    pub size: String,
    /// Image payloads, stored verbatim
    #[oai(default)]
    pub base64_images: Vec<String>,
}

#[derive(Debug, Clone, Object)]
pub struct CreateProductRequest {
    /// Product name (cannot be blank)
    #[oai(default)]
    pub name: String,
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    /// One of SPRING, SUMMER, FALL, WINTER
    pub season: String,
    /// At least one variant is required
    #[oai(default)]
    pub variants: Vec<CreateVariantRequest>,
}

#[derive(Debug, Clone, Object)]
pub struct UpdateImageRequest {
    /// Id of an image of this product to keep, or 0 for a new image
    #[oai(default)]
    pub id: i64,
    pub base64_data: String,
}

#[derive(Debug, Clone, Object)]
pub struct UpdateVariantRequest {
    /// Id of a variant of this product to keep, or 0 for a new variant
    #[oai(default)]
    pub id: i64,
    pub price: f64,
    pub stock: i32,
    pub color: String,
    pub size: String,
    #[oai(default)]
    pub images: Vec<UpdateImageRequest>,
}

/// Full replacement of a product. Variants and images not listed are deleted.
#[derive(Debug, Clone, Object)]
pub struct UpdateProductRequest {
    #[oai(default)]
    pub name: String,
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    pub season: String,
    #[oai(default)]
    pub variants: Vec<UpdateVariantRequest>,
}

#[derive(Debug, Clone, Object)]
pub struct DecreaseStockRequest {
    /// Units to remove, strictly positive
    pub quantity: i32,
}

#[derive(Debug, Clone, Object)]
pub struct ProductImageResponse {
    pub id: i64,
    pub base64_data: String,
}

#[derive(Debug, Clone, Object)]
pub struct ProductVariantResponse {
    pub id: i64,
    pub price: f64,
    pub stock: i32,
    pub color: String,
    pub size: String,
    pub images: Vec<ProductImageResponse>,
}

#[derive(Debug, Clone, Object)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    pub season: String,
    pub variants: Vec<ProductVariantResponse>,
}

#[derive(Debug, Clone, Object)]
pub struct DeleteProductResponseBody {
    pub success: bool,
    pub message: String,
}

impl From<ProductImage> for ProductImageResponse {
    fn from(image: ProductImage) -> Self {
        Self {
            id: image.id,
            base64_data: image.base64_data,
        }
    }
}

impl From<ProductVariant> for ProductVariantResponse {
    fn from(variant: ProductVariant) -> Self {
        Self {
            id: variant.id,
            price: variant.price,
            stock: variant.stock,
            color: variant.color,
            size: variant.size.to_string(),
            images: variant.images.into_iter().map(|i| i.into()).collect(),
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            season: product.season.to_string(),
            variants: product.variants.into_iter().map(|v| v.into()).collect(),
        }
    }
}

impl From<DeleteResult> for DeleteProductResponseBody {
    fn from(result: DeleteResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
        }
    }
}
