use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::domain::product::use_cases::create::CreateProductUseCase;
use business::domain::product::use_cases::decrease_stock::DecreaseStockUseCase;
use business::domain::product::use_cases::delete::{DeleteProductParams, DeleteProductUseCase};
use business::domain::product::use_cases::get_all::GetAllProductsUseCase;
use business::domain::product::use_cases::get_by_id::{
    GetProductByIdParams, GetProductByIdUseCase,
};
use business::domain::product::use_cases::update::{UpdateProductParams, UpdateProductUseCase};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::product::dto::{
    CreateProductRequest, DecreaseStockRequest, DeleteProductResponseBody, ProductResponse,
    UpdateProductRequest,
};
use crate::api::product::mapper;
use crate::api::tags::ApiTags;

pub struct ProductApi {
    create_use_case: Arc<dyn CreateProductUseCase>,
    get_all_use_case: Arc<dyn GetAllProductsUseCase>,
    get_by_id_use_case: Arc<dyn GetProductByIdUseCase>,
    update_use_case: Arc<dyn UpdateProductUseCase>,
    delete_use_case: Arc<dyn DeleteProductUseCase>,
    decrease_stock_use_case: Arc<dyn DecreaseStockUseCase>,
}

impl ProductApi {
    pub fn new(
        create_use_case: Arc<dyn CreateProductUseCase>,
        get_all_use_case: Arc<dyn GetAllProductsUseCase>,
        get_by_id_use_case: Arc<dyn GetProductByIdUseCase>,
        update_use_case: Arc<dyn UpdateProductUseCase>,
        delete_use_case: Arc<dyn DeleteProductUseCase>,
        decrease_stock_use_case: Arc<dyn DecreaseStockUseCase>,
    ) -> Self {
        Self {
            create_use_case,
            get_all_use_case,
            get_by_id_use_case,
            update_use_case,
            delete_use_case,
            decrease_stock_use_case,
        }
    }
}

/// Product catalog API
///
/// Endpoints for managing products together with their variants and images.
#[OpenApi]
impl ProductApi {
    /// Create a new product
    ///
    /// Stores the product, its variants and their images in one transaction.
    #[oai(path = "/products", method = "post", tag = "ApiTags::Products")]
    async fn create_product(&self, body: Json<CreateProductRequest>) -> CreateProductResponse {
        let result = match mapper::to_create_dto(body.0) {
            Ok(params) => self.create_use_case.execute(params).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(product) => CreateProductResponse::Created(Json(product.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => CreateProductResponse::BadRequest(json),
                    _ => CreateProductResponse::InternalError(json),
                }
            }
        }
    }

    /// List all products
    ///
    /// Returns every product with its full variant and image tree, ordered by id.
    #[oai(path = "/products", method = "get", tag = "ApiTags::Products")]
    async fn get_all_products(&self) -> GetAllProductsResponse {
        match self.get_all_use_case.execute().await {
            Ok(products) => {
                let responses: Vec<ProductResponse> =
                    products.into_iter().map(|p| p.into()).collect();
                GetAllProductsResponse::Ok(Json(responses))
            }
            Err(err) => {
                let (_status, json) = err.into_error_response();
                GetAllProductsResponse::InternalError(json)
            }
        }
    }

    /// Get a product by ID
    #[oai(path = "/products/:id", method = "get", tag = "ApiTags::Products")]
    async fn get_product_by_id(&self, id: Path<i64>) -> GetProductByIdResponse {
        match self
            .get_by_id_use_case
            .execute(GetProductByIdParams { id: id.0 })
            .await
        {
            Ok(product) => GetProductByIdResponse::Ok(Json(product.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    404 => GetProductByIdResponse::NotFound(json),
                    _ => GetProductByIdResponse::InternalError(json),
                }
            }
        }
    }

    /// Replace a product
    ///
    /// Overwrites the product fields and replaces its whole variant list.
    /// Variants and images missing from the body are deleted; nested ids that
    /// belonged to this product are kept, any other id is treated as new.
    #[oai(path = "/products/:id", method = "put", tag = "ApiTags::Products")]
    async fn update_product(
        &self,
        id: Path<i64>,
        body: Json<UpdateProductRequest>,
    ) -> UpdateProductResponse {
        let result = match mapper::to_product(id.0, body.0) {
            Ok(product) => {
                self.update_use_case
                    .execute(UpdateProductParams { product })
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(product) => UpdateProductResponse::Ok(Json(product.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => UpdateProductResponse::BadRequest(json),
                    404 => UpdateProductResponse::NotFound(json),
                    _ => UpdateProductResponse::InternalError(json),
                }
            }
        }
    }

    /// Delete a product
    ///
    /// Removes the product with all of its variants and images.
    #[oai(path = "/products/:id", method = "delete", tag = "ApiTags::Products")]
    async fn delete_product(&self, id: Path<i64>) -> DeleteProductResponse {
        match self
            .delete_use_case
            .execute(DeleteProductParams { id: id.0 })
            .await
        {
            Ok(result) if result.success => DeleteProductResponse::Ok(Json(result.into())),
            Ok(result) => DeleteProductResponse::NotFound(Json(result.into())),
            Err(err) => {
                let (_status, json) = err.into_error_response();
                DeleteProductResponse::InternalError(json)
            }
        }
    }

    /// Decrease the stock of a variant
    ///
    /// Fails with 412 when the variant holds fewer units than requested, in
    /// which case the stock is left unchanged. Returns the owning product.
    #[oai(
        path = "/variants/:id/decrease-stock",
        method = "post",
        tag = "ApiTags::Variants"
    )]
    async fn decrease_stock(
        &self,
        id: Path<i64>,
        body: Json<DecreaseStockRequest>,
    ) -> DecreaseStockResponse {
        let result = match mapper::to_decrease_stock_params(id.0, body.0) {
            Ok(params) => self.decrease_stock_use_case.execute(params).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(product) => DecreaseStockResponse::Ok(Json(product.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                match status.as_u16() {
                    400 => DecreaseStockResponse::BadRequest(json),
                    404 => DecreaseStockResponse::NotFound(json),
                    412 => DecreaseStockResponse::PreconditionFailed(json),
                    _ => DecreaseStockResponse::InternalError(json),
                }
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum CreateProductResponse {
    #[oai(status = 201)]
    Created(Json<ProductResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetAllProductsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ProductResponse>>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetProductByIdResponse {
    #[oai(status = 200)]
    Ok(Json<ProductResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum UpdateProductResponse {
    #[oai(status = 200)]
    Ok(Json<ProductResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum DeleteProductResponse {
    #[oai(status = 200)]
    Ok(Json<DeleteProductResponseBody>),
    #[oai(status = 404)]
    NotFound(Json<DeleteProductResponseBody>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum DecreaseStockResponse {
    #[oai(status = 200)]
    Ok(Json<ProductResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 412)]
    PreconditionFailed(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
