//! Multipart product form decoding.

use crate::error::ApiResult;
use axum::extract::Multipart;
use catalogue_core::{ImageUpload, ProductFields};
use utoipa::ToSchema;

/// Multipart form accepted by the create and update endpoints.
///
/// Only used for the OpenAPI document; handlers decode the form with [`read_product_form`].
/// Every field is optional on update.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProductForm {
    name: Option<String>,
    /// Decimal number, for example `9.99`
    price: Option<String>,
    /// Non-negative integer
    quantity: Option<String>,
    description: Option<String>,
    /// png, jpg, jpeg, gif or webp; other extensions are ignored
    #[schema(format = Binary)]
    image: Option<String>,
}

/// Reads the product fields and the optional `image` file part.
///
/// Unknown parts are skipped. An `image` part without a filename (or with an empty one) counts
/// as "no image", which is what browsers send for an untouched file input.
pub async fn read_product_form(
    mut multipart: Multipart,
) -> ApiResult<(ProductFields, Option<ImageUpload>)> {
    let mut fields = ProductFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .filter(|f| !f.is_empty());
                let data = field.bytes().await?;
                if let Some(filename) = filename {
                    image = Some(ImageUpload {
                        filename,
                        data: data.to_vec(),
                    });
                }
            }
            "name" => fields.name = Some(field.text().await?),
            "price" => fields.price = Some(field.text().await?),
            "quantity" => fields.quantity = Some(field.text().await?),
            "description" => fields.description = Some(field.text().await?),
            other => tracing::debug!("ignoring unknown form field {:?}", other),
        }
    }

    Ok((fields, image))
}
