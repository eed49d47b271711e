//! `/api/uploads/{filename}`: raw image bytes.

use crate::error::{run_blocking, ApiResult, ErrorBody};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use catalogue_core::{CatalogueError, ImageStore};

#[utoipa::path(
    get,
    path = "/api/uploads/{filename}",
    params(("filename" = String, Path, description = "Stored image filename")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "No such image", body = ErrorBody)
    )
)]
/// Serve a stored product image.
///
/// The filename comes straight from the URL and is validated by the image store, so names
/// such as `../products.json` are answered with 404.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let products = state.products;
    let name = filename.clone();
    let data = run_blocking(move || {
        products
            .images()
            .read(&name)
            .map_err(CatalogueError::Files)
    })
    .await?;
    let content_type = ImageStore::media_type(&data, &filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}
