//! Constants used throughout the catalogue core crate.

pub use catalogue_files::DEFAULT_UPLOAD_DIR;

/// Default location of the persisted product list when no explicit path is configured.
pub const DEFAULT_DATA_FILE: &str = "products.json";

/// Default request body limit for uploads (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Message returned for any lookup of an unknown product id.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
