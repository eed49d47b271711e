//! `/api/products` handlers.

use crate::error::{run_blocking, ApiError, ApiResult, ErrorBody};
use crate::form::{read_product_form, ProductForm};
use crate::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    response::Json,
};
use catalogue_core::{constants::PRODUCT_NOT_FOUND, Product};
use serde::Serialize;
use utoipa::ToSchema;

/// Product as returned by the API.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProductSchema {
    id: u64,
    name: String,
    price: f64,
    quantity: u64,
    description: String,
    /// Filename under `/api/uploads/`
    image: Option<String>,
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = [ProductSchema]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// List every product in the catalogue.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.products;
    Ok(Json(run_blocking(move || products.list()).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductSchema),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Create a product from a multipart form.
///
/// `name`, `price` and `quantity` are required. An `image` with a disallowed extension is
/// ignored and the product is created without one.
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (fields, image) = read_product_form(multipart).await?;

    let products = state.products;
    let product = run_blocking(move || products.create(fields, image)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = u64, Path, description = "Product id")),
    request_body(content = ProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ProductSchema),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Merge the supplied form fields into an existing product.
///
/// Fields that are not sent keep their current values. A new accepted `image` replaces the
/// old file.
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = id.map_err(|_| product_not_found())?;
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let (fields, image) = read_product_form(multipart).await?;

    let products = state.products;
    let product = run_blocking(move || products.update(id, fields, image)).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
/// Delete a product and its image.
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<MessageBody>> {
    let Path(id) = id.map_err(|_| product_not_found())?;

    let products = state.products;
    run_blocking(move || products.delete(id)).await?;
    Ok(Json(MessageBody {
        message: "Product deleted successfully".into(),
    }))
}

/// Ids that cannot be parsed cannot exist either.
fn product_not_found() -> ApiError {
    ApiError::NotFound(PRODUCT_NOT_FOUND.into())
}
