//! Upload-directory image storage
//!
//! This module provides [`ImageStore`], the only component that touches image files on disk.
//!
//! # Security Model
//!
//! - Names written by [`ImageStore::save`] come from [`sanitize_upload_name`] and are always a
//!   single flat path component.
//! - Names passed to [`ImageStore::read`], [`ImageStore::exists`] and [`ImageStore::delete`]
//!   are treated as untrusted (they arrive straight from a URL or from the persisted product
//!   list) and are validated independently: anything other than one plain path component is
//!   refused, and reads additionally canonicalise the target and require it to sit inside the
//!   canonicalised upload directory, which defeats symlinks pointing elsewhere.
//!
//! # Implementation Notes
//!
//! - Files are never overwritten. A same-second collision on the stamped name falls back to
//!   numbered alternatives (`_2`, `_3`, ...).
//! - Deleting a file that is already gone is not an error.

use crate::constants::MAX_NAME_ATTEMPTS;
use crate::filename::sanitize_upload_name;
use crate::{FilesError, FilesResult};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

/// Service for storing product images in a flat upload directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at `upload_dir`.
    ///
    /// No I/O happens here; the directory is created on the first save or by
    /// [`Self::ensure_upload_dir`].
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Creates the upload directory (and parents) if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the directory cannot be created.
    pub fn ensure_upload_dir(&self) -> FilesResult<()> {
        fs::create_dir_all(&self.upload_dir).map_err(|e| {
            FilesError::Io(io::Error::new(
                e.kind(),
                format!(
                    "Failed to create upload directory {}: {}",
                    self.upload_dir.display(),
                    e
                ),
            ))
        })
    }

    /// Stores `data` under a sanitised, timestamped version of `proposed_name`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(name))` with the stored filename, relative to the upload directory
    /// - `Ok(None)` if the sanitiser rejected `proposed_name`; nothing is written
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the directory cannot be created, the file cannot be written,
    /// or no free name was found after a handful of attempts.
    pub fn save(&self, data: &[u8], proposed_name: &str) -> FilesResult<Option<String>> {
        self.save_at(data, proposed_name, Local::now().naive_local())
    }

    /// Same as [`Self::save`] with an explicit upload time.
    pub fn save_at(
        &self,
        data: &[u8],
        proposed_name: &str,
        now: NaiveDateTime,
    ) -> FilesResult<Option<String>> {
        let Some(upload_name) = sanitize_upload_name(proposed_name, now) else {
            return Ok(None);
        };

        self.ensure_upload_dir()?;

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = if attempt == 1 {
                upload_name.file_name()
            } else {
                upload_name.file_name_with_suffix(attempt)
            };
            let path = self.upload_dir.join(&name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(FilesError::Io(io::Error::new(
                        e.kind(),
                        format!("Failed to create image file {}: {}", path.display(), e),
                    )))
                }
            };

            if let Err(e) = file.write_all(data).and_then(|()| file.sync_all()) {
                drop(file);
                // A truncated image must not stay behind under a name nobody references.
                let _ = fs::remove_file(&path);
                return Err(FilesError::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to write image file {}: {}", path.display(), e),
                )));
            }

            return Ok(Some(name));
        }

        Err(FilesError::Io(io::Error::new(
            ErrorKind::AlreadyExists,
            format!(
                "failed to allocate a unique image filename after {} attempts",
                MAX_NAME_ATTEMPTS
            ),
        )))
    }

    /// Removes `filename` from the upload directory.
    ///
    /// Returns `Ok(true)` if a file was deleted and `Ok(false)` if there was nothing to delete.
    /// A name that cannot live inside the upload directory counts as "nothing to delete".
    ///
    /// # Errors
    ///
    /// Returns `FilesError::Io` if the file exists but cannot be removed.
    pub fn delete(&self, filename: &str) -> FilesResult<bool> {
        let Ok(path) = self.resolve(filename) else {
            return Ok(false);
        };

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FilesError::Io(io::Error::new(
                e.kind(),
                format!("Failed to delete image file {}: {}", path.display(), e),
            ))),
        }
    }

    /// Returns `true` if `filename` names a regular file inside the upload directory.
    pub fn exists(&self, filename: &str) -> bool {
        self.contained_path(filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Reads an image back by its stored filename.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `filename` is not a single plain path component, or resolves outside the upload
    ///   directory (`InvalidPath`)
    /// - no such file exists (`NotFound`)
    /// - the file cannot be read (`Io`)
    pub fn read(&self, filename: &str) -> FilesResult<Vec<u8>> {
        let path = self.contained_path(filename)?;

        if !path.is_file() {
            return Err(FilesError::NotFound(filename.to_owned()));
        }

        fs::read(&path).map_err(|e| {
            FilesError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read image file {}: {}", path.display(), e),
            ))
        })
    }

    /// Best-effort media type for serving an image.
    ///
    /// Magic bytes win; the filename extension is the fallback.
    pub fn media_type(data: &[u8], filename: &str) -> &'static str {
        if let Some(kind) = infer::get(data) {
            return kind.mime_type();
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }

    /// Joins a single plain path component onto the upload directory.
    fn resolve(&self, filename: &str) -> FilesResult<PathBuf> {
        let invalid = || FilesError::InvalidPath(filename.to_owned());

        if filename.contains('\0') || filename.contains('\\') || filename.starts_with('.') {
            return Err(invalid());
        }

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => Ok(self.upload_dir.join(part)),
            _ => Err(invalid()),
        }
    }

    /// Resolves `filename` and verifies the canonical target stays inside the upload directory.
    fn contained_path(&self, filename: &str) -> FilesResult<PathBuf> {
        let path = self.resolve(filename)?;

        let not_found = |e: io::Error| {
            if e.kind() == ErrorKind::NotFound {
                FilesError::NotFound(filename.to_owned())
            } else {
                FilesError::Io(e)
            }
        };

        let root = self.upload_dir.canonicalize().map_err(not_found)?;
        let canonical = path.canonicalize().map_err(not_found)?;

        if !canonical.starts_with(&root) {
            return Err(FilesError::InvalidPath(filename.to_owned()));
        }

        Ok(canonical)
    }
}
