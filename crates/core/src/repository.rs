//! Product list persistence.
//!
//! The whole catalogue lives in one JSON document holding an array of [`Product`] records.
//! Every operation reads the full list, changes it in memory and writes the full list back;
//! nothing is cached between calls.
//!
//! ## Atomic replacement
//!
//! [`JsonFileRepository::save_all`] never writes the data file in place. The new document is
//! written to a temporary file in the same directory, flushed to disk and then renamed over the
//! target, so a crash mid-write leaves either the old or the new document, never a truncated one.

use crate::product::Product;
use crate::{CatalogueError, CatalogueResult};
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load/store access to the full product list.
pub trait ProductRepository: Send + Sync {
    /// Returns every stored product in persisted order.
    ///
    /// A store that has never been written returns an empty list.
    fn load_all(&self) -> CatalogueResult<Vec<Product>>;

    /// Replaces the stored list with `products`.
    fn save_all(&self, products: &[Product]) -> CatalogueResult<()>;
}

/// Next free identifier: one more than the largest id in `products`, or 1 for an empty list.
///
/// # Errors
///
/// Returns `CatalogueError::IdsExhausted` if the largest id is already `u64::MAX`.
pub fn next_id(products: &[Product]) -> CatalogueResult<u64> {
    match products.iter().map(|product| product.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(CatalogueError::IdsExhausted(max)),
    }
}

/// [`ProductRepository`] backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    data_file: PathBuf,
}

impl JsonFileRepository {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    fn data_dir(&self) -> &Path {
        match self.data_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn corrupt(&self, json_path: String, source: serde_json::Error) -> CatalogueError {
        CatalogueError::CorruptData {
            path: self.data_file.clone(),
            json_path,
            source,
        }
    }
}

impl ProductRepository for JsonFileRepository {
    /// # Errors
    ///
    /// Returns:
    /// - `CatalogueError::Storage` if the file exists but cannot be read,
    /// - `CatalogueError::CorruptData` if the contents are not a JSON array of products
    ///   (an empty file counts as corrupt).
    fn load_all(&self) -> CatalogueResult<Vec<Product>> {
        let contents = match fs::read_to_string(&self.data_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogueError::storage(
                    format!("failed to read {}", self.data_file.display()),
                    e,
                ))
            }
        };

        let mut deserializer = serde_json::Deserializer::from_str(&contents);
        let products: Vec<Product> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| {
                let json_path = e.path().to_string();
                self.corrupt(json_path, e.into_inner())
            })?;
        deserializer
            .end()
            .map_err(|e| self.corrupt(".".into(), e))?;

        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `CatalogueError::Storage` if the directory, the temporary file or the final
    /// rename fails. The previous document is left untouched in every failure case.
    fn save_all(&self, products: &[Product]) -> CatalogueResult<()> {
        let dir = self.data_dir();
        fs::create_dir_all(dir).map_err(|e| {
            CatalogueError::storage(format!("failed to create {}", dir.display()), e)
        })?;

        let write_err = |e: std::io::Error| {
            CatalogueError::storage(
                format!("failed to write {}", self.data_file.display()),
                e,
            )
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, products)
                .map_err(|e| write_err(e.into()))?;
            writer.write_all(b"\n").map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&self.data_file)
            .map_err(|e| write_err(e.error))?;

        tracing::debug!(
            "saved {} products to {}",
            products.len(),
            self.data_file.display()
        );
        Ok(())
    }
}
