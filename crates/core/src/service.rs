//! Product catalogue operations.
//!
//! [`ProductService`] ties the [`ProductRepository`] to the [`ImageStore`] and owns the image
//! lifecycle: images are written when a product is created or given a new picture, and removed
//! when they are replaced or their product is deleted.
//!
//! ## Write discipline
//!
//! Every mutation is a full read-modify-write of the product list. All clones of a service share
//! one write lock, held from `load_all` until `save_all` returns, so the id computation, the
//! mutation and the write-back form a single critical section. Uploaded image bytes are written
//! *before* the lock is taken, so slow disk I/O for images never blocks other writers. Reads do
//! not take the lock; the repository's atomic replacement means they always see a complete list.
//!
//! Writers in other processes (for example the CLI running alongside the server) are not
//! coordinated with.

use crate::config::CoreConfig;
use crate::product::{ImageUpload, Product, ProductFields};
use crate::repository::{next_id, JsonFileRepository, ProductRepository};
use crate::{CatalogueError, CatalogueResult};
use catalogue_files::ImageStore;
use std::sync::{Arc, Mutex, MutexGuard};

/// Service for listing and changing catalogue products.
pub struct ProductService<R = JsonFileRepository> {
    repository: Arc<R>,
    images: ImageStore,
    write_lock: Arc<Mutex<()>>,
}

impl<R> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: self.images.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for ProductService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("repository", &self.repository)
            .field("images", &self.images)
            .finish_non_exhaustive()
    }
}

impl ProductService<JsonFileRepository> {
    /// Creates a service over the JSON data file and upload directory named in `cfg`.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_repository(
            JsonFileRepository::new(cfg.data_file()),
            ImageStore::new(cfg.upload_dir()),
        )
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn with_repository(repository: R, images: ImageStore) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Returns the whole catalogue in persisted order.
    pub fn list(&self) -> CatalogueResult<Vec<Product>> {
        self.repository.load_all()
    }

    /// Returns a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::ProductNotFound` if no product has `id`, or any repository error.
    pub fn get(&self, id: u64) -> CatalogueResult<Product> {
        self.repository
            .load_all()?
            .into_iter()
            .find(|product| product.id == id)
            .ok_or(CatalogueError::ProductNotFound(id))
    }

    /// Creates a product and returns it with its newly assigned id.
    ///
    /// `name`, `price` and `quantity` are required; `description` defaults to empty. An image
    /// whose filename the sanitiser rejects (for example `setup.exe`) is silently dropped and
    /// the product is created without an image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError` if:
    /// - a field is missing or invalid (`Validation`); nothing is written in that case,
    /// - the image cannot be stored (`Files`),
    /// - the product list cannot be read or written (`Storage`, `CorruptData`). A freshly
    ///   stored image is removed again in that case,
    /// - the largest stored id is `u64::MAX` (`IdsExhausted`).
    pub fn create(
        &self,
        fields: ProductFields,
        image: Option<ImageUpload>,
    ) -> CatalogueResult<Product> {
        let new_product = fields.validate()?.into_new()?;
        let stored_image = self.store_image(image.as_ref())?;

        let result = {
            let _guard = self.lock();
            self.repository.load_all().and_then(|mut products| {
                let product = new_product.with_id(next_id(&products)?, stored_image.clone());
                products.push(product.clone());
                self.repository.save_all(&products)?;
                Ok(product)
            })
        };

        match result {
            Ok(product) => {
                tracing::info!(
                    "created product {} ({}) image={:?}",
                    product.id,
                    product.name,
                    product.image
                );
                Ok(product)
            }
            Err(e) => {
                self.discard_image(stored_image.as_deref());
                Err(e)
            }
        }
    }

    /// Merges the supplied fields into product `id` and returns the updated record.
    ///
    /// Fields left as `None` keep their current values. If `image` is supplied and accepted,
    /// it becomes the product's image and the previous file is deleted once the list has been
    /// saved; a rejected image leaves the current one in place.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError` if:
    /// - no product has `id` (`ProductNotFound`),
    /// - a supplied field is invalid (`Validation`),
    /// - the image cannot be stored (`Files`),
    /// - the product list cannot be read or written (`Storage`, `CorruptData`).
    ///
    /// On any error after the new image was stored, that image is removed again.
    pub fn update(
        &self,
        id: u64,
        fields: ProductFields,
        image: Option<ImageUpload>,
    ) -> CatalogueResult<Product> {
        let patch = fields.validate()?;
        let stored_image = self.store_image(image.as_ref())?;

        let result = {
            let _guard = self.lock();
            self.repository.load_all().and_then(|mut products| {
                let product = products
                    .iter_mut()
                    .find(|product| product.id == id)
                    .ok_or(CatalogueError::ProductNotFound(id))?;

                patch.apply(product);
                let replaced = match &stored_image {
                    Some(name) => product.image.replace(name.clone()),
                    None => None,
                };
                let updated = product.clone();

                self.repository.save_all(&products)?;
                Ok((updated, replaced))
            })
        };

        match result {
            Ok((product, replaced)) => {
                if let Some(old) = replaced {
                    if let Err(e) = self.images.delete(&old) {
                        tracing::warn!(
                            "product {} saved but old image {} could not be deleted: {}",
                            product.id,
                            old,
                            e
                        );
                    }
                }
                tracing::info!("updated product {}", product.id);
                Ok(product)
            }
            Err(e) => {
                self.discard_image(stored_image.as_deref());
                Err(e)
            }
        }
    }

    /// Deletes product `id` together with its image file.
    ///
    /// The image is removed *before* the shortened list is saved. If saving then fails, the
    /// image is gone while the record still references it; callers see the storage error and
    /// the record keeps pointing at a missing file until it is updated or deleted again.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError` if:
    /// - no product has `id` (`ProductNotFound`),
    /// - the image file exists but cannot be removed (`Files`); the list is untouched,
    /// - the product list cannot be read or written (`Storage`, `CorruptData`).
    pub fn delete(&self, id: u64) -> CatalogueResult<()> {
        let _guard = self.lock();
        let mut products = self.repository.load_all()?;

        let index = products
            .iter()
            .position(|product| product.id == id)
            .ok_or(CatalogueError::ProductNotFound(id))?;

        if let Some(image) = &products[index].image {
            self.images.delete(image)?;
        }

        products.remove(index);
        self.repository.save_all(&products)?;

        tracing::info!("deleted product {}", id);
        Ok(())
    }

    fn store_image(&self, image: Option<&ImageUpload>) -> CatalogueResult<Option<String>> {
        let Some(upload) = image else {
            return Ok(None);
        };

        let stored = self.images.save(&upload.data, &upload.filename)?;
        if stored.is_none() {
            tracing::info!(
                "ignoring upload with disallowed filename {:?}",
                upload.filename
            );
        }
        Ok(stored)
    }

    fn discard_image(&self, name: Option<&str>) {
        let Some(name) = name else {
            return;
        };
        if let Err(e) = self.images.delete(name) {
            tracing::warn!("failed to clean up image {} after error: {}", name, e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
