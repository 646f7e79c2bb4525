//! Request to domain translation. Every check here runs before storage is touched.

use business::domain::product::dto::{ProductCreateDto, ProductVariantCreateDto};
use business::domain::product::errors::ProductError;
use business::domain::product::model::{Product, ProductImage, ProductVariant};
use business::domain::product::use_cases::decrease_stock::DecreaseStockParams;
use business::domain::product::value_objects::{Season, Size};

use crate::api::product::dto::{
    CreateProductRequest, CreateVariantRequest, DecreaseStockRequest, UpdateProductRequest,
    UpdateVariantRequest,
};

fn require_name(name: &str) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::validation("Product name is required."));
    }
    Ok(())
}

fn require_variants<T>(variants: &[T]) -> Result<(), ProductError> {
    if variants.is_empty() {
        return Err(ProductError::validation(
            "At least one product variant is required.",
        ));
    }
    Ok(())
}

fn check_price_and_stock(price: f64, stock: i32) -> Result<(), ProductError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductError::validation(
            "Variant price must be a non-negative number.",
        ));
    }
    if price > ProductVariant::MAX_PRICE {
        return Err(ProductError::validation(
            "Variant price must not exceed 9999999999.99.",
        ));
    }
    if stock < 0 {
        return Err(ProductError::validation("Variant stock must not be negative."));
    }
    Ok(())
}

fn to_variant_create_dto(
    request: CreateVariantRequest,
) -> Result<ProductVariantCreateDto, ProductError> {
    check_price_and_stock(request.price, request.stock)?;
    Ok(ProductVariantCreateDto {
        price: request.price,
        stock: request.stock,
        color: request.color,
        size: request.size.parse::<Size>()?,
        base64_images: request.base64_images,
    })
}

fn to_variant(request: UpdateVariantRequest) -> Result<ProductVariant, ProductError> {
    check_price_and_stock(request.price, request.stock)?;
    Ok(ProductVariant {
        id: request.id,
        price: request.price,
        stock: request.stock,
        color: request.color,
        size: request.size.parse::<Size>()?,
        images: request
            .images
            .into_iter()
            .map(|image| ProductImage {
                id: image.id,
                base64_data: image.base64_data,
            })
            .collect(),
    })
}

pub fn to_create_dto(request: CreateProductRequest) -> Result<ProductCreateDto, ProductError> {
    require_name(&request.name)?;
    require_variants(&request.variants)?;

    Ok(ProductCreateDto {
        name: request.name,
        description: request.description,
        season: request.season.parse::<Season>()?,
        variants: request
            .variants
            .into_iter()
            .map(to_variant_create_dto)
            .collect::<Result<_, _>>()?,
    })
}

/// Builds the replacement tree for `id`. Nested ids of `0` denote new rows.
pub fn to_product(id: i64, request: UpdateProductRequest) -> Result<Product, ProductError> {
    if id == 0 {
        return Err(ProductError::validation("Product ID is required for update."));
    }
    require_name(&request.name)?;
    require_variants(&request.variants)?;

    Ok(Product {
        id,
        name: request.name,
        description: request.description,
        season: request.season.parse::<Season>()?,
        variants: request
            .variants
            .into_iter()
            .map(to_variant)
            .collect::<Result<_, _>>()?,
    })
}

pub fn to_decrease_stock_params(
    variant_id: i64,
    request: DecreaseStockRequest,
) -> Result<DecreaseStockParams, ProductError> {
    if variant_id == 0 {
        return Err(ProductError::validation("Product variant ID is required."));
    }
    if request.quantity <= 0 {
        return Err(ProductError::validation("Quantity must be greater than zero."));
    }
    Ok(DecreaseStockParams {
        variant_id,
        quantity: request.quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::product::dto::UpdateImageRequest;

    fn variant_request() -> CreateVariantRequest {
        CreateVariantRequest {
            price: 49.99,
            stock: 10,
            color: "black".to_string(),
            size: "M".to_string(),
            base64_images: vec!["base64A".to_string()],
        }
    }

    fn create_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Jacket".to_string(),
            description: None,
            season: "WINTER".to_string(),
            variants: vec![variant_request()],
        }
    }

    fn update_request() -> UpdateProductRequest {
        UpdateProductRequest {
            name: "Jacket".to_string(),
            description: Some("Lined".to_string()),
            season: "FALL".to_string(),
            variants: vec![UpdateVariantRequest {
                id: 12,
                price: 10.0,
                stock: 0,
                color: "navy".to_string(),
                size: "XXL".to_string(),
                images: vec![UpdateImageRequest {
                    id: 0,
                    base64_data: "img".to_string(),
                }],
            }],
        }
    }

    fn validation_message(error: ProductError) -> String {
        match error {
            ProductError::Validation(message) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn should_map_create_request() {
        let dto = to_create_dto(create_request()).unwrap();

        assert_eq!(dto.name, "Jacket");
        assert_eq!(dto.season, Season::Winter);
        assert_eq!(dto.variants[0].size, Size::M);
        assert_eq!(dto.variants[0].base64_images, vec!["base64A".to_string()]);
    }

    #[test]
    fn should_require_name() {
        let mut request = create_request();
        request.name = "   ".to_string();

        let error = to_create_dto(request).unwrap_err();

        assert_eq!(validation_message(error), "Product name is required.");
    }

    #[test]
    fn should_require_a_variant() {
        let mut request = create_request();
        request.variants.clear();

        let error = to_create_dto(request).unwrap_err();

        assert_eq!(
            validation_message(error),
            "At least one product variant is required."
        );
    }

    #[test]
    fn should_reject_negative_price_and_stock() {
        let mut request = create_request();
        request.variants[0].price = -0.01;
        assert_eq!(
            validation_message(to_create_dto(request).unwrap_err()),
            "Variant price must be a non-negative number."
        );

        let mut request = create_request();
        request.variants[0].stock = -1;
        assert_eq!(
            validation_message(to_create_dto(request).unwrap_err()),
            "Variant stock must not be negative."
        );
    }

    #[test]
    fn should_bound_price_by_column_precision() {
        let mut request = create_request();
        request.variants[0].price = ProductVariant::MAX_PRICE;
        assert!(to_create_dto(request).is_ok());

        let mut request = create_request();
        request.variants[0].price = 1e12;
        assert_eq!(
            validation_message(to_create_dto(request).unwrap_err()),
            "Variant price must not exceed 9999999999.99."
        );

        let mut request = update_request();
        request.variants[0].price = 1e10;
        assert_eq!(
            validation_message(to_product(4, request).unwrap_err()),
            "Variant price must not exceed 9999999999.99."
        );
    }

    #[test]
    fn should_reject_unknown_enum_tokens() {
        let mut request = create_request();
        request.season = "winter".to_string();
        let error = to_create_dto(request).unwrap_err();
        assert!(matches!(error, ProductError::InvalidEnumValue(_)));
        assert_eq!(error.to_string(), "Invalid season value: 'winter'");

        let mut request = create_request();
        request.variants[0].size = "XXXL".to_string();
        assert!(matches!(
            to_create_dto(request).unwrap_err(),
            ProductError::InvalidEnumValue(_)
        ));
    }

    #[test]
    fn should_map_update_request_keeping_nested_ids() {
        let product = to_product(4, update_request()).unwrap();

        assert_eq!(product.id, 4);
        assert_eq!(product.season, Season::Fall);
        assert_eq!(product.variants[0].id, 12);
        assert_eq!(product.variants[0].size, Size::Xxl);
        assert_eq!(product.variants[0].images[0].id, 0);
    }

    #[test]
    fn should_require_product_id_for_update() {
        let error = to_product(0, update_request()).unwrap_err();

        assert_eq!(
            validation_message(error),
            "Product ID is required for update."
        );
    }

    #[test]
    fn should_require_variants_for_update() {
        let mut request = update_request();
        request.variants.clear();

        let error = to_product(4, request).unwrap_err();

        assert_eq!(
            validation_message(error),
            "At least one product variant is required."
        );
    }

    #[test]
    fn should_validate_decrease_stock_input() {
        let params = to_decrease_stock_params(10, DecreaseStockRequest { quantity: 3 }).unwrap();
        assert_eq!(params.variant_id, 10);
        assert_eq!(params.quantity, 3);

        let error = to_decrease_stock_params(0, DecreaseStockRequest { quantity: 3 }).unwrap_err();
        assert_eq!(validation_message(error), "Product variant ID is required.");

        let error = to_decrease_stock_params(10, DecreaseStockRequest { quantity: 0 }).unwrap_err();
        assert_eq!(
            validation_message(error),
            "Quantity must be greater than zero."
        );
    }
}
