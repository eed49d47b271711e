//! Product records and the untrusted input used to create or change them.

use crate::{CatalogueError, CatalogueResult};
use catalogue_types::{NonEmptyText, Price};
use serde::{Deserialize, Deserializer, Serialize};

/// A catalogue entry as persisted in the product data file and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "positive_id")]
    pub id: u64,
    pub name: NonEmptyText,
    pub price: Price,
    pub quantity: u64,
    #[serde(default)]
    pub description: String,
    /// Filename relative to the upload directory.
    #[serde(default)]
    pub image: Option<String>,
}

/// Raw form fields as supplied by a client.
///
/// `None` means the field was not supplied at all. For updates this keeps the current value
/// (merge patch); for creates `name`, `price` and `quantity` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub description: Option<String>,
}

/// An uploaded image payload with the filename the client proposed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Validated subset of [`ProductFields`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProductPatch {
    name: Option<NonEmptyText>,
    price: Option<Price>,
    quantity: Option<u64>,
    description: Option<String>,
}

/// Validated fields for a product that does not have an id yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewProduct {
    pub name: NonEmptyText,
    pub price: Price,
    pub quantity: u64,
    pub description: String,
}

impl ProductFields {
    /// Validates every supplied field.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::Validation` if:
    /// - `name` is blank,
    /// - `price` is not a finite non-negative number,
    /// - `quantity` is not a non-negative integer.
    pub(crate) fn validate(self) -> CatalogueResult<ProductPatch> {
        Ok(ProductPatch {
            name: self.name.map(NonEmptyText::new).transpose()?,
            price: self.price.as_deref().map(Price::parse).transpose()?,
            quantity: self.quantity.as_deref().map(parse_quantity).transpose()?,
            description: self.description,
        })
    }
}

impl ProductPatch {
    /// Turns the patch into a complete product, failing on missing required fields.
    pub(crate) fn into_new(self) -> CatalogueResult<NewProduct> {
        Ok(NewProduct {
            name: self.name.ok_or_else(|| missing("name"))?,
            price: self.price.ok_or_else(|| missing("price"))?,
            quantity: self.quantity.ok_or_else(|| missing("quantity"))?,
            description: self.description.unwrap_or_default(),
        })
    }

    /// Overwrites the fields present in the patch; `id` and `image` are never touched here.
    pub(crate) fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
    }
}

impl NewProduct {
    pub(crate) fn with_id(self, id: u64, image: Option<String>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            image,
        }
    }
}

fn parse_quantity(input: &str) -> CatalogueResult<u64> {
    let trimmed = input.trim();
    trimmed.parse().map_err(|_| {
        CatalogueError::Validation(format!(
            "quantity must be a non-negative integer, got '{trimmed}'"
        ))
    })
}

/// Stored ids are assigned from 1 upwards, so 0 can only come from a damaged document.
fn positive_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match u64::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("product id must be positive")),
        id => Ok(id),
    }
}

fn missing(field: &str) -> CatalogueError {
    CatalogueError::Validation(format!("{field} is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: &str, quantity: &str) -> ProductFields {
        ProductFields {
            name: Some(name.into()),
            price: Some(price.into()),
            quantity: Some(quantity.into()),
            description: None,
        }
    }

    fn widget() -> Product {
        Product {
            id: 1,
            name: NonEmptyText::new("Widget").unwrap(),
            price: Price::new(9.99).unwrap(),
            quantity: 5,
            description: "blue".into(),
            image: Some("widget_20240115_103045.png".into()),
        }
    }

    #[test]
    fn test_product_serialises_with_null_image() {
        let mut product = widget();
        product.description = String::new();
        product.image = None;

        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Widget",
                "price": 9.99,
                "quantity": 5,
                "description": "",
                "image": null
            })
        );
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{"id": 2, "name": "Gadget", "price": 1, "quantity": 0}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.description, "");
        assert_eq!(product.image, None);
        assert_eq!(product.price.value(), 1.0);
    }

    #[test]
    fn test_validate_and_into_new() {
        let new = fields(" Widget ", "9.99", " 5 ")
            .validate()
            .unwrap()
            .into_new()
            .unwrap();

        assert_eq!(new.name.as_str(), "Widget");
        assert_eq!(new.price.value(), 9.99);
        assert_eq!(new.quantity, 5);
        assert_eq!(new.description, "");
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        for (price, quantity) in [("abc", "1"), ("-1", "1"), ("1", "1.5"), ("1", "-3"), ("1", "")] {
            let result = fields("Widget", price, quantity).validate();
            assert!(
                matches!(result, Err(CatalogueError::Validation(_))),
                "price={price:?} quantity={quantity:?} should fail"
            );
        }
    }

    #[test]
    fn test_into_new_requires_fields() {
        let result = ProductFields {
            name: Some("Widget".into()),
            price: Some("1".into()),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_new();

        match result {
            Err(CatalogueError::Validation(msg)) => assert_eq!(msg, "quantity is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = fields("   ", "1", "1").validate();
        assert!(matches!(result, Err(CatalogueError::Validation(_))));
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut product = widget();
        let patch = ProductFields {
            price: Some("12.50".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        patch.apply(&mut product);

        assert_eq!(product.price.value(), 12.5);
        assert_eq!(product.name.as_str(), "Widget");
        assert_eq!(product.quantity, 5);
        assert_eq!(product.description, "blue");
        assert_eq!(product.image.as_deref(), Some("widget_20240115_103045.png"));
    }
}
