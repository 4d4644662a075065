//! Fetching an ordered batch of fragments and row-unioning the results.

use crate::observations::error::ObservationError;
use crate::observations::loader::load_fragment;
use crate::transport::RemoteSource;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::functions::concat_df_diagonal;

/// What to do when one fragment of a batch cannot be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFetchError {
    /// Propagate the failure and abandon the whole batch.
    Abort,
    /// Log a warning and continue with the remaining fragments.
    Skip,
}

/// Failure tolerance per import path.
///
/// A partial annual or monthly summary is misleading, so the aggregate path
/// gives up on the first failed year. Per-site files go missing routinely
/// (sites close, providers lapse), so that path skips them instead. Both
/// sides are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub aggregate: OnFetchError,
    pub per_site: OnFetchError,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            aggregate: OnFetchError::Abort,
            per_site: OnFetchError::Skip,
        }
    }
}

/// Fetches each URL in order and parses the results. Fragment order always
/// matches input order; a failed fetch either aborts the batch or is skipped
/// with a warning, per `on_error`. Parse failures always propagate.
pub(crate) async fn fetch_fragments(
    source: &dyn RemoteSource,
    urls: &[String],
    on_error: OnFetchError,
    show_progress: bool,
) -> Result<Vec<DataFrame>, ObservationError> {
    let mut frames = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
        match load_fragment(source, url).await {
            Ok(frame) => {
                if show_progress {
                    info!("Fetched {} ({}/{})", url, index + 1, urls.len());
                }
                frames.push(frame);
            }
            Err(ObservationError::Fetch(e)) if on_error == OnFetchError::Skip => {
                warn!("Skipping {}: {}", url, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(frames)
}

/// Row-unions fragments in input order. The schema is the union of all
/// fragment columns; values a fragment does not carry are filled null rather
/// than rejected.
pub fn concat_fragments(frames: Vec<DataFrame>) -> Result<DataFrame, ObservationError> {
    if frames.is_empty() {
        return Ok(DataFrame::empty());
    }
    concat_df_diagonal(&frames).map_err(ObservationError::from)
}
