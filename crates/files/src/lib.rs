//! Catalogue image storage
//!
//! This crate owns everything the catalogue does with uploaded image bytes on disk:
//!
//! - turning an untrusted, client-supplied filename into a safe on-disk name
//!   ([`filename::sanitize_upload_name`])
//! - writing, deleting and reading image files under a single upload directory
//!   ([`ImageStore`])
//!
//! ## Storage Layout
//!
//! The upload directory is flat. Every stored file is named after the sanitised original
//! base name plus the upload timestamp:
//!
//! ```text
//! uploads/
//! ├── photo_20240115_103045.jpg
//! ├── photo_20240115_103045_2.jpg   # same name, same second
//! └── banner_20240116_090000.webp
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use catalogue_files::ImageStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ImageStore::new("uploads");
//! if let Some(stored) = store.save(b"\x89PNG...", "holiday photo.png")? {
//!     let bytes = store.read(&stored)?;
//!     assert!(!bytes.is_empty());
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
pub mod filename;
mod images;

pub use constants::{ALLOWED_EXTENSIONS, DEFAULT_UPLOAD_DIR};
pub use filename::{sanitize_upload_name, UploadName};
pub use images::ImageStore;

/// Errors that can occur during image file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The filename cannot refer to a file inside the upload directory
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No such file in the upload directory
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;
