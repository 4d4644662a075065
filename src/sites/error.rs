use crate::transport::FetchError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to parse site metadata JSON")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to build site metadata frame")]
    Frame(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
