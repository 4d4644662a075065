use crate::transport::FetchError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("I/O error processing CSV data from '{url}'")]
    CsvReadIo {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing error processing CSV data from '{url}'")]
    CsvReadPolars {
        url: String,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
