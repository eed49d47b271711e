//! # Catalogue REST API
//!
//! HTTP surface for the product catalogue.
//!
//! Handles:
//! - HTTP endpoints with axum (`/api/products`, `/api/uploads`, `/health`)
//! - multipart form decoding for product create/update
//! - mapping `CatalogueError` kinds to status codes and `{"error": ...}` bodies
//! - OpenAPI/Swagger documentation, CORS, request body limits, optional static front-end
//!
//! Uses `catalogue-core` for all data operations.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod form;
pub mod health;
pub mod products;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use catalogue_core::ProductService;
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub products: ProductService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        products::list_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        uploads::serve_upload,
    ),
    components(schemas(
        health::HealthRes,
        products::ProductSchema,
        products::MessageBody,
        form::ProductForm,
        error::ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// `max_upload_bytes` caps request bodies (and therefore image uploads). When `static_dir` is
/// set, any path not matched by the API is served from that directory, with `index.html`
/// answering `/`.
pub fn router(state: AppState, max_upload_bytes: usize, static_dir: Option<PathBuf>) -> Router {
    let app = Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/api/uploads/:filename", get(uploads::serve_upload))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state);

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}
