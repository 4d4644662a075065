mod client;
mod error;
mod notice;
mod observations;
mod reshape;
mod resource;
mod sites;
mod transport;
mod types;

pub use client::*;
pub use error::LocalAirError;
pub use notice::QcNotice;
pub use reshape::AirFrameExt;
pub use resource::DEFAULT_BASE_URL;

pub use observations::combine::{concat_fragments, FetchPolicy, OnFetchError};
pub use observations::error::ObservationError;
pub use observations::importer::{SiteImportRequest, SiteImporter, UkAirImporter};

pub use sites::catalog::{Resolution, SiteCatalog};
pub use sites::error::CatalogError;

pub use transport::{FetchError, HttpSource, RemoteSource};

pub use types::data_type::{DataType, ParseDataTypeError, PathKind};
pub use types::pollutant::PollutantFilter;
pub use types::site::{SiteFolderPair, SiteRecord};
