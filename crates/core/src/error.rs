use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", crate::constants::PRODUCT_NOT_FOUND)]
    ProductNotFound(u64),

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "product data file {path} is corrupt at '{json_path}': {source}",
        path = path.display()
    )]
    CorruptData {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no product ids left after {0}")]
    IdsExhausted(u64),

    #[error(transparent)]
    Files(#[from] catalogue_files::FilesError),
}

impl CatalogueError {
    pub(crate) fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }
}

impl From<catalogue_types::TextError> for CatalogueError {
    fn from(_: catalogue_types::TextError) -> Self {
        Self::Validation("name cannot be empty".into())
    }
}

impl From<catalogue_types::PriceError> for CatalogueError {
    fn from(e: catalogue_types::PriceError) -> Self {
        Self::Validation(e.to_string())
    }
}

pub type CatalogueResult<T> = std::result::Result<T, CatalogueError>;
