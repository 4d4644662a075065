use crate::observations::error::ObservationError;
use crate::sites::error::CatalogError;
use crate::types::data_type::ParseDataTypeError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalAirError {
    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    InvalidDataType(#[from] ParseDataTypeError),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),

    #[error("No years requested")]
    EmptyYears,

    #[error("Requested year {0} is not a plausible four-digit year")]
    InvalidYear(i32),

    #[error("No locally managed site found for {0:?}")]
    UnknownSites(Vec<String>),
}
