//! The site metadata catalog for the locally managed networks: which sites
//! exist, which sub-network folder publishes each of them, and the static
//! attributes used for metadata enrichment.

use crate::resource;
use crate::sites::error::CatalogError;
use crate::transport::RemoteSource;
use crate::types::site::{SiteFolderPair, SiteRecord};
use log::info;
use polars::frame::DataFrame;
use polars::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;

/// Requested site codes resolved against the metadata catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per requested site present in the catalog, in request order.
    pub pairs: Vec<SiteFolderPair>,
    /// Requested codes with no catalog entry. What to do with these is the
    /// caller's policy, not the catalog's.
    pub unmatched: Vec<String>,
}

/// In-memory view of the site metadata catalog.
///
/// The full listing is fetched once per client (`all` sites, not just the
/// requested ones) and kept for the client's lifetime; it is read-only after
/// population. The source listing carries multiple historical rows per site,
/// collapsed here to the first occurrence per site code.
pub struct SiteCatalog {
    source: Arc<dyn RemoteSource>,
    base_url: String,
    records: Mutex<Option<Arc<Vec<SiteRecord>>>>,
}

impl SiteCatalog {
    pub fn new(source: Arc<dyn RemoteSource>, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            records: Mutex::new(None),
        }
    }

    /// Returns the deduplicated catalog, fetching it on first use.
    pub async fn records(&self) -> Result<Arc<Vec<SiteRecord>>, CatalogError> {
        {
            let records = self.records.lock().await;
            if let Some(cached) = records.as_ref() {
                return Ok(Arc::clone(cached));
            }
            // Not yet populated; release the lock before downloading.
        }

        let url = resource::metadata_url(&self.base_url);
        let bytes = self.source.fetch(&url).await?;
        let parsed = task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<SiteRecord>>(&bytes).map_err(CatalogError::from)
        })
        .await??;
        let deduplicated = Arc::new(dedup_by_code(parsed));
        info!(
            "Loaded metadata for {} locally managed sites",
            deduplicated.len()
        );

        let mut records = self.records.lock().await;
        // A concurrent caller may have populated the cache while we were
        // downloading; first writer wins.
        Ok(Arc::clone(records.get_or_insert(deduplicated)))
    }

    /// Maps requested site codes to the sub-network folders publishing them.
    ///
    /// Each site resolves independently, so one request may span several
    /// folders. Codes without a catalog entry come back in
    /// [`Resolution::unmatched`] rather than disappearing in a join.
    pub async fn resolve(&self, codes: &[String]) -> Result<Resolution, CatalogError> {
        let records = self.records().await?;
        let mut pairs = Vec::with_capacity(codes.len());
        let mut unmatched = Vec::new();
        for code in codes {
            let entry = records
                .iter()
                .find(|record| record.code.eq_ignore_ascii_case(code));
            match entry {
                Some(record) => pairs.push(SiteFolderPair {
                    code: code.to_uppercase(),
                    pcode: record.pcode.clone(),
                }),
                None => unmatched.push(code.clone()),
            }
        }
        Ok(Resolution { pairs, unmatched })
    }

    /// Static site attributes as a frame keyed by `code`, for joining onto
    /// observation rows.
    pub async fn metadata_frame(&self) -> Result<DataFrame, CatalogError> {
        let records = self.records().await?;
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        let names: Vec<&str> = records.iter().map(|r| r.site.as_str()).collect();
        let latitudes: Vec<Option<f64>> = records.iter().map(|r| r.latitude).collect();
        let longitudes: Vec<Option<f64>> = records.iter().map(|r| r.longitude).collect();
        let site_types: Vec<Option<&str>> =
            records.iter().map(|r| r.site_type.as_deref()).collect();
        let frame = df!(
            "code" => codes,
            "site" => names,
            "latitude" => latitudes,
            "longitude" => longitudes,
            "site_type" => site_types,
        )?;
        Ok(frame)
    }
}

/// Joins static site attributes onto observation rows by site code. Rows
/// without a catalog match keep null metadata fields rather than being
/// dropped. Columns the observation frame already carries win name clashes.
pub(crate) fn attach_site_metadata(
    frame: DataFrame,
    metadata: &DataFrame,
) -> PolarsResult<DataFrame> {
    let existing: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let keep: Vec<&str> = metadata
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .filter(|name| *name == "code" || !existing.iter().any(|column| column == name))
        .collect();
    let metadata = metadata.select(keep)?;
    frame.join(&metadata, ["code"], ["code"], JoinArgs::new(JoinType::Left), None)
}

fn dedup_by_code(records: Vec<SiteRecord>) -> Vec<SiteRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.code.to_uppercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticSource;

    const BASE: &str = "https://files.test/lmam";

    fn metadata_json() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!([
            {
                "code": "AD1",
                "site": "Shoeburyness",
                "pcode": "lmam_ess",
                "latitude": 51.53,
                "longitude": 0.80,
                "site_type": "Urban Background",
                "provider": "Essex Air",
                "start_date": "2008-03-01"
            },
            {
                "code": "ad1",
                "site": "Shoeburyness (relocated)",
                "pcode": "lmam_old"
            },
            {
                "code": "CI1",
                "site": "Chelmsford",
                "pcode": "lmam_ess",
                "latitude": 51.73,
                "longitude": 0.47,
                "site_type": "Roadside"
            },
            {
                "code": "MY7",
                "site": "Marylebone",
                "pcode": "lmam_ldn"
            }
        ]))
        .unwrap()
    }

    fn catalog() -> SiteCatalog {
        let source = StaticSource::new().with(resource::metadata_url(BASE), metadata_json());
        SiteCatalog::new(Arc::new(source), BASE)
    }

    #[tokio::test]
    async fn deduplicates_by_code_keeping_the_first_row() -> Result<(), CatalogError> {
        let catalog = catalog();
        let records = catalog.records().await?;
        assert_eq!(records.len(), 3);
        let ad1: Vec<_> = records
            .iter()
            .filter(|record| record.code.eq_ignore_ascii_case("AD1"))
            .collect();
        assert_eq!(ad1.len(), 1);
        assert_eq!(ad1[0].pcode, "lmam_ess");
        Ok(())
    }

    #[tokio::test]
    async fn fetches_the_listing_once_per_catalog() -> Result<(), CatalogError> {
        let source = Arc::new(StaticSource::new().with(resource::metadata_url(BASE), metadata_json()));
        let shared: Arc<dyn RemoteSource> = source.clone();
        let catalog = SiteCatalog::new(shared, BASE);
        catalog.records().await?;
        catalog.records().await?;
        catalog.resolve(&["AD1".to_string()]).await?;
        assert_eq!(source.hits(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn resolves_sites_to_their_own_folders() -> Result<(), CatalogError> {
        let catalog = catalog();
        let resolution = catalog
            .resolve(&["AD1".to_string(), "MY7".to_string()])
            .await?;
        assert_eq!(resolution.unmatched, Vec::<String>::new());
        assert_eq!(resolution.pairs.len(), 2);
        assert_eq!(resolution.pairs[0].pcode, "lmam_ess");
        assert_eq!(resolution.pairs[1].pcode, "lmam_ldn");
        Ok(())
    }

    #[tokio::test]
    async fn reports_codes_missing_from_the_catalog() -> Result<(), CatalogError> {
        let catalog = catalog();
        let resolution = catalog
            .resolve(&["ZZ9".to_string(), "CI1".to_string()])
            .await?;
        assert_eq!(resolution.unmatched, ["ZZ9".to_string()]);
        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].code, "CI1");
        Ok(())
    }

    #[tokio::test]
    async fn metadata_join_keeps_rows_without_a_match() -> Result<(), CatalogError> {
        let catalog = catalog();
        let metadata = catalog.metadata_frame().await?;
        let observations = df!(
            "code" => ["AD1", "ZZ9"],
            "no2" => [12.0, 15.5],
        )?;
        let enriched = attach_site_metadata(observations, &metadata)?;
        assert_eq!(enriched.height(), 2);
        let latitudes = enriched.column("latitude")?.f64()?;
        assert_eq!(latitudes.get(0), Some(51.53));
        assert_eq!(latitudes.get(1), None);
        Ok(())
    }
}
