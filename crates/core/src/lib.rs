//! # Catalogue Core
//!
//! Core business logic for the product catalogue.
//!
//! This crate contains pure data operations and file management:
//! - Product records persisted as a single JSON document (`CATALOGUE_DATA_FILE`)
//! - Product images stored in a flat upload directory (`CATALOGUE_UPLOAD_DIR`)
//! - Identifier assignment and image lifecycle across create/update/delete
//!
//! **No API concerns**: HTTP routing, multipart decoding and status codes belong in
//! `catalogue-api-rest`; terminal output belongs in `catalogue-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod product;
pub mod repository;
pub mod service;

pub use catalogue_files::{FilesError, ImageStore};
pub use catalogue_types::{NonEmptyText, Price, PriceError, TextError};
pub use config::CoreConfig;
pub use error::{CatalogueError, CatalogueResult};
pub use product::{ImageUpload, Product, ProductFields};
pub use repository::{next_id, JsonFileRepository, ProductRepository};
pub use service::ProductService;
