//! The per-site importer: locates and combines one site's data files under
//! its sub-network folder.

use crate::observations::combine::{concat_fragments, fetch_fragments, OnFetchError};
use crate::observations::error::ObservationError;
use crate::reshape::AirFrameExt;
use crate::resource;
use crate::transport::RemoteSource;
use crate::types::data_type::DataType;
use crate::types::pollutant::PollutantFilter;
use async_trait::async_trait;
use polars::frame::DataFrame;
use std::sync::Arc;

/// One per-site import job: a resolved site, the years to fetch and the
/// post-processing the caller asked for.
#[derive(Debug, Clone)]
pub struct SiteImportRequest {
    /// Upper-cased site code.
    pub code: String,
    /// Sub-network folder publishing this site's files.
    pub pcode: String,
    pub years: Vec<i32>,
    pub data_type: DataType,
    pub pollutant: PollutantFilter,
    /// Locally managed networks only publish unratified data, so the
    /// orchestrator always passes `false`.
    pub ratified: bool,
    pub narrow: bool,
    pub show_progress: bool,
}

/// Imports observation data for a single site.
#[async_trait]
pub trait SiteImporter: Send + Sync {
    /// Returns the site's combined frame, or `None` when no file could be
    /// retrieved for any requested year.
    async fn import_site(
        &self,
        request: &SiteImportRequest,
    ) -> Result<Option<DataFrame>, ObservationError>;
}

/// Importer for the UK-AIR publishing layout: one gzipped CSV per site, data
/// type and year, stored under the owning sub-network folder.
pub struct UkAirImporter {
    source: Arc<dyn RemoteSource>,
    base_url: String,
    on_fetch_error: OnFetchError,
}

impl UkAirImporter {
    pub fn new(
        source: Arc<dyn RemoteSource>,
        base_url: impl Into<String>,
        on_fetch_error: OnFetchError,
    ) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            on_fetch_error,
        }
    }
}

#[async_trait]
impl SiteImporter for UkAirImporter {
    async fn import_site(
        &self,
        request: &SiteImportRequest,
    ) -> Result<Option<DataFrame>, ObservationError> {
        let urls: Vec<String> = request
            .years
            .iter()
            .map(|&year| {
                resource::site_data_url(
                    &self.base_url,
                    &request.pcode,
                    &request.code,
                    request.data_type,
                    year,
                    request.ratified,
                )
            })
            .collect();

        let frames = fetch_fragments(
            self.source.as_ref(),
            &urls,
            self.on_fetch_error,
            request.show_progress,
        )
        .await?;
        if frames.is_empty() {
            return Ok(None);
        }

        let combined = concat_fragments(frames)?;
        let filtered = combined.filter_pollutants(&request.pollutant, false)?;
        let result = if request.narrow {
            filtered.to_narrow()?
        } else {
            filtered
        };
        Ok(Some(result))
    }
}
