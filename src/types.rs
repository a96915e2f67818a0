use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed to initialize connection pool: {0}")]
pub struct PoolInitializationError(pub String);

/// Error surface of the catalog service. No operation retries on its own;
/// every failure propagates to the caller with its kind intact.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

impl From<diesel::result::Error> for CatalogError {
    fn from(err: diesel::result::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
