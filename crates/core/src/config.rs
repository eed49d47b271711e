//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. The
//! intent is to avoid reading process-wide environment variables during request handling. The
//! `*_from_env_value` helpers take the raw variable value so binaries stay in charge of *where*
//! values come from while parsing rules live here.

use crate::constants::{DEFAULT_DATA_FILE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_DIR};
use crate::{CatalogueError, CatalogueResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_file: PathBuf,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::Validation` if either path is empty, if `data_file` names a
    /// directory, or if `max_upload_bytes` is zero.
    pub fn new(
        data_file: PathBuf,
        upload_dir: PathBuf,
        max_upload_bytes: usize,
    ) -> CatalogueResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(CatalogueError::Validation(
                "data file path cannot be empty".into(),
            ));
        }
        if data_file.is_dir() {
            return Err(CatalogueError::Validation(format!(
                "data file path is a directory: {}",
                data_file.display()
            )));
        }
        if upload_dir.as_os_str().is_empty() {
            return Err(CatalogueError::Validation(
                "upload directory path cannot be empty".into(),
            ));
        }
        if max_upload_bytes == 0 {
            return Err(CatalogueError::Validation(
                "max upload size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            data_file,
            upload_dir,
            max_upload_bytes,
        })
    }

    /// Build a configuration from raw environment variable values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        data_file: Option<String>,
        upload_dir: Option<String>,
        max_upload_bytes: Option<String>,
    ) -> CatalogueResult<Self> {
        Self::new(
            path_from_env_value(data_file, DEFAULT_DATA_FILE),
            path_from_env_value(upload_dir, DEFAULT_UPLOAD_DIR),
            max_upload_bytes_from_env_value(max_upload_bytes)?,
        )
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a path from an optional string value, using `default` for `None` or blank values.
pub fn path_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Parse the upload size limit (in bytes) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_UPLOAD_BYTES`].
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> CatalogueResult<usize> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    value.parse::<usize>().map_err(|_| {
        CatalogueError::Validation(format!(
            "CATALOGUE_MAX_UPLOAD_BYTES must be a positive integer, got '{value}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_unset_or_blank() {
        let cfg = CoreConfig::from_env_values(None, Some("   ".into()), None).unwrap();

        assert_eq!(cfg.data_file(), Path::new(DEFAULT_DATA_FILE));
        assert_eq!(cfg.upload_dir(), Path::new(DEFAULT_UPLOAD_DIR));
        assert_eq!(cfg.max_upload_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn test_explicit_values_are_used() {
        let cfg = CoreConfig::from_env_values(
            Some("/srv/catalogue/products.json".into()),
            Some("/srv/catalogue/uploads".into()),
            Some(" 1024 ".into()),
        )
        .unwrap();

        assert_eq!(cfg.data_file(), Path::new("/srv/catalogue/products.json"));
        assert_eq!(cfg.upload_dir(), Path::new("/srv/catalogue/uploads"));
        assert_eq!(cfg.max_upload_bytes(), 1024);
    }

    #[test]
    fn test_invalid_upload_limit_is_rejected() {
        for value in ["lots", "-1", "0"] {
            let result = CoreConfig::from_env_values(None, None, Some(value.into()));
            assert!(
                matches!(result, Err(CatalogueError::Validation(_))),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_data_file_must_not_be_a_directory() {
        let temp = TempDir::new().unwrap();
        let result = CoreConfig::new(
            temp.path().to_path_buf(),
            temp.path().join("uploads"),
            DEFAULT_MAX_UPLOAD_BYTES,
        );

        assert!(matches!(result, Err(CatalogueError::Validation(_))));
    }
}
