//! Data structures describing monitoring sites in the locally managed
//! network metadata catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One monitoring site as listed in the metadata catalog.
///
/// The source catalog carries a row per site and monitoring campaign, so the
/// same `code` can appear several times; [`crate::SiteCatalog`] collapses
/// those to the first occurrence before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Short site code, e.g. "AD1".
    pub code: String,
    /// Human readable site name, e.g. "Shoeburyness".
    pub site: String,
    /// Sub-network folder under which the owning network publishes this
    /// site's data files.
    pub pcode: String,
    /// Latitude in decimal degrees, if surveyed.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if surveyed.
    pub longitude: Option<f64>,
    /// Site classification, e.g. "Urban Background" or "Roadside".
    pub site_type: Option<String>,
    /// The council or network operating the site.
    pub provider: Option<String>,
    /// First day of monitoring, if recorded.
    pub start_date: Option<NaiveDate>,
    /// Last day of monitoring; open-ended when absent.
    pub end_date: Option<NaiveDate>,
}

/// A requested site resolved to the sub-network folder that publishes it.
///
/// Folders are resolved independently per site; two sites in one request may
/// legitimately live under different folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFolderPair {
    /// Upper-cased site code.
    pub code: String,
    /// Sub-network folder identifier.
    pub pcode: String,
}
