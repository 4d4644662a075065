//! The main entry point for importing air quality data from locally managed
//! (non-national) UK monitoring networks.

use crate::error::LocalAirError;
use crate::notice::{QcNotice, DEFAULT_NOTICE_COOLDOWN};
use crate::observations::combine::{concat_fragments, fetch_fragments, FetchPolicy};
use crate::observations::importer::{SiteImportRequest, SiteImporter, UkAirImporter};
use crate::reshape::AirFrameExt;
use crate::resource::{self, DEFAULT_BASE_URL};
use crate::sites::catalog::{attach_site_metadata, SiteCatalog};
use crate::transport::{HttpSource, RemoteSource};
use crate::types::data_type::{DataType, PathKind};
use crate::types::pollutant::PollutantFilter;
use bon::bon;
use log::warn;
use polars::frame::DataFrame;
use std::sync::Arc;
use std::time::Duration;

/// What to do when a requested site code has no entry in the metadata
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownSitePolicy {
    /// Fail the call, naming the unknown codes.
    Error,
    /// Log a warning and continue with the remaining sites.
    #[default]
    Warn,
    /// Continue silently.
    Ignore,
}

const DEFAULT_SITE: &str = "AD1";
const DEFAULT_YEAR: i32 = 2018;

/// The client for data published by locally managed UK air quality
/// monitoring networks.
///
/// Locally managed networks are run by councils and regional partnerships
/// rather than by the national network operator. Their data is published in
/// two shapes: per-site time-series files located through a site metadata
/// catalog, and network-wide summary statistics files (one per year). The
/// client hides that split behind a single [`LocalAir::import`] call.
///
/// Create an instance with [`LocalAir::new()`] for the default HTTP
/// transport and policies, or [`LocalAir::with_config()`] to inject a
/// transport, importer, publisher root or failure policy.
///
/// # Examples
///
/// ```no_run
/// # use localair::{LocalAir, LocalAirError};
/// # async fn run() -> Result<(), LocalAirError> {
/// let client = LocalAir::new();
/// let data = client.import().call().await?;
/// println!("{data}");
/// # Ok(())
/// # }
/// ```
pub struct LocalAir {
    source: Arc<dyn RemoteSource>,
    importer: Arc<dyn SiteImporter>,
    catalog: SiteCatalog,
    notice: QcNotice,
    base_url: String,
    unknown_sites: UnknownSitePolicy,
    fetch_policy: FetchPolicy,
}

#[bon]
impl LocalAir {
    /// Creates a client with the default HTTP transport and policies.
    pub fn new() -> Self {
        Self::with_config().call()
    }

    /// Creates a client with explicit collaborators and policies.
    ///
    /// This method uses a builder pattern; every argument is optional.
    ///
    /// # Arguments
    ///
    /// * `.source(Arc<dyn RemoteSource>)`: the transport used for every
    ///   remote fetch. Defaults to [`HttpSource`].
    /// * `.importer(Arc<dyn SiteImporter>)`: the per-site importer the
    ///   per-site path delegates to. Defaults to [`UkAirImporter`] over the
    ///   same transport and base URL.
    /// * `.base_url(String)`: the publisher root. Defaults to
    ///   [`DEFAULT_BASE_URL`].
    /// * `.notice_cooldown(Duration)`: suppression window of the recurring
    ///   data-quality advisory. Defaults to eight hours.
    /// * `.unknown_sites(UnknownSitePolicy)`: what to do with requested
    ///   sites missing from the metadata catalog. Defaults to
    ///   [`UnknownSitePolicy::Warn`].
    /// * `.fetch_policy(FetchPolicy)`: per-path failure tolerance. Defaults
    ///   to aborting on a failed summary fetch and skipping failed per-site
    ///   fetches.
    #[builder]
    pub fn with_config(
        source: Option<Arc<dyn RemoteSource>>,
        importer: Option<Arc<dyn SiteImporter>>,
        base_url: Option<String>,
        notice_cooldown: Option<Duration>,
        unknown_sites: Option<UnknownSitePolicy>,
        fetch_policy: Option<FetchPolicy>,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let source: Arc<dyn RemoteSource> =
            source.unwrap_or_else(|| Arc::new(HttpSource::new()));
        let fetch_policy = fetch_policy.unwrap_or_default();
        let importer: Arc<dyn SiteImporter> = importer.unwrap_or_else(|| {
            Arc::new(UkAirImporter::new(
                Arc::clone(&source),
                base_url.clone(),
                fetch_policy.per_site,
            ))
        });
        Self {
            catalog: SiteCatalog::new(Arc::clone(&source), base_url.clone()),
            notice: QcNotice::new(notice_cooldown.unwrap_or(DEFAULT_NOTICE_COOLDOWN)),
            unknown_sites: unknown_sites.unwrap_or_default(),
            fetch_policy,
            source,
            importer,
            base_url,
        }
    }

    /// Imports air quality data from the locally managed networks.
    ///
    /// For [`DataType::Annual`] and [`DataType::Monthly`] the client fetches
    /// the pre-computed network-wide summary file for each requested year and
    /// combines them. For every other data type it resolves each requested
    /// site to its owning sub-network folder through the metadata catalog and
    /// imports that site's files. Exactly one of the two paths runs per call.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.sites(Vec<String>)`: site codes, case-insensitive. Defaults to
    ///   `["AD1"]` on the per-site path. On the aggregate path, leaving this
    ///   unset returns the whole network rather than filtering to the
    ///   default site.
    /// * `.years(Vec<i32>)`: years to fetch, combined in the given order.
    ///   Defaults to `[2018]`.
    /// * `.data_type(DataType)`: resolution or summary statistic. Defaults
    ///   to [`DataType::Hourly`].
    /// * `.pollutant(PollutantFilter)`: pollutant columns to keep. Defaults
    ///   to [`PollutantFilter::All`].
    /// * `.include_meta(bool)`: join static site metadata (name,
    ///   coordinates, site type) onto each row. Defaults to `false`.
    /// * `.narrow(bool)`: return one row per (site, timestamp, pollutant)
    ///   instead of one column per pollutant. Defaults to `false`.
    /// * `.show_progress(bool)`: log each completed fetch. Defaults to
    ///   `true`.
    ///
    /// # Returns
    ///
    /// A `DataFrame` with one row per observation (wide) or per observation
    /// and pollutant (narrow). Sites with no published data simply
    /// contribute no rows.
    ///
    /// # Errors
    ///
    /// Returns [`LocalAirError::EmptyYears`] or [`LocalAirError::InvalidYear`]
    /// before any fetch for malformed requests, [`LocalAirError::UnknownSites`]
    /// under [`UnknownSitePolicy::Error`], and fetch, parse or frame errors
    /// from the underlying collaborators per the configured [`FetchPolicy`].
    #[builder]
    pub async fn import(
        &self,
        sites: Option<Vec<String>>,
        years: Option<Vec<i32>>,
        data_type: Option<DataType>,
        pollutant: Option<PollutantFilter>,
        include_meta: Option<bool>,
        narrow: Option<bool>,
        show_progress: Option<bool>,
    ) -> Result<DataFrame, LocalAirError> {
        let years = years.unwrap_or_else(|| vec![DEFAULT_YEAR]);
        let data_type = data_type.unwrap_or(DataType::Hourly);
        let pollutant = pollutant.unwrap_or_default();
        let include_meta = include_meta.unwrap_or(false);
        let narrow = narrow.unwrap_or(false);
        let show_progress = show_progress.unwrap_or(true);

        if years.is_empty() {
            return Err(LocalAirError::EmptyYears);
        }
        if let Some(&year) = years.iter().find(|&&year| !(1000..=9999).contains(&year)) {
            return Err(LocalAirError::InvalidYear(year));
        }

        self.notice.emit();

        let frame = match data_type.kind() {
            PathKind::Aggregate => {
                self.import_aggregate(
                    sites.as_deref(),
                    &years,
                    data_type,
                    &pollutant,
                    narrow,
                    show_progress,
                )
                .await?
            }
            PathKind::PerSite => {
                self.import_per_site(sites, &years, data_type, &pollutant, narrow, show_progress)
                    .await?
            }
        };

        if include_meta {
            let metadata = self.catalog.metadata_frame().await?;
            return attach_site_metadata(frame, &metadata).map_err(LocalAirError::from);
        }
        Ok(frame)
    }

    /// Network-wide summary statistics: one file per year, filtered down to
    /// the requested sites and pollutants afterwards.
    async fn import_aggregate(
        &self,
        sites: Option<&[String]>,
        years: &[i32],
        data_type: DataType,
        pollutant: &PollutantFilter,
        narrow: bool,
        show_progress: bool,
    ) -> Result<DataFrame, LocalAirError> {
        let urls: Vec<String> = years
            .iter()
            .map(|&year| resource::summary_url(&self.base_url, data_type, year))
            .collect();
        let fragments = fetch_fragments(
            self.source.as_ref(),
            &urls,
            self.fetch_policy.aggregate,
            show_progress,
        )
        .await?;
        let mut frame = concat_fragments(fragments)?;

        // Only an explicit site request narrows a summary; the default site
        // must not shrink a whole-network statistic.
        if let Some(codes) = sites {
            frame = frame.filter_sites(codes)?;
        }
        frame = frame.filter_pollutants(pollutant, true)?;
        if narrow {
            frame = frame.to_narrow()?;
        }
        Ok(frame)
    }

    /// Per-site time series: resolve each site's sub-network folder, then
    /// delegate to the site importer once per resolved site.
    async fn import_per_site(
        &self,
        sites: Option<Vec<String>>,
        years: &[i32],
        data_type: DataType,
        pollutant: &PollutantFilter,
        narrow: bool,
        show_progress: bool,
    ) -> Result<DataFrame, LocalAirError> {
        let requested: Vec<String> = sites
            .unwrap_or_else(|| vec![DEFAULT_SITE.to_string()])
            .iter()
            .map(|code| code.to_uppercase())
            .collect();

        let resolution = self.catalog.resolve(&requested).await?;
        if !resolution.unmatched.is_empty() {
            match self.unknown_sites {
                UnknownSitePolicy::Error => {
                    return Err(LocalAirError::UnknownSites(resolution.unmatched))
                }
                UnknownSitePolicy::Warn => warn!(
                    "No locally managed site found for: {}",
                    resolution.unmatched.join(", ")
                ),
                UnknownSitePolicy::Ignore => {}
            }
        }

        let mut frames = Vec::with_capacity(resolution.pairs.len());
        for pair in &resolution.pairs {
            let request = SiteImportRequest {
                code: pair.code.clone(),
                pcode: pair.pcode.clone(),
                years: years.to_vec(),
                data_type,
                pollutant: pollutant.clone(),
                ratified: false,
                narrow,
                show_progress,
            };
            if let Some(frame) = self.importer.import_site(&request).await? {
                frames.push(frame);
            }
        }
        concat_fragments(frames).map_err(LocalAirError::from)
    }
}

impl Default for LocalAir {
    fn default() -> Self {
        Self::new()
    }
}
