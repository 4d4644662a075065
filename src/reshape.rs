//! Post-processing of combined observation frames: site and pollutant
//! filtering and the wide-to-narrow pivot.

use crate::types::pollutant::PollutantFilter;
use polars::prelude::*;

/// Columns that identify an observation row rather than carry a measurement.
const ID_COLUMNS: [&str; 3] = ["date", "site", "code"];

/// Suffix of the data-capture columns that summary statistics carry
/// alongside each pollutant value.
const CAPTURE_SUFFIX: &str = "_capture";

fn is_id_column(name: &str) -> bool {
    ID_COLUMNS.contains(&name)
}

pub trait AirFrameExt: Sized {
    /// Restricts rows to the given site codes (case-insensitive).
    fn filter_sites(self, codes: &[String]) -> PolarsResult<DataFrame>;

    /// Keeps identifying columns plus the requested pollutant columns that
    /// are present in the frame. `keep_capture` additionally retains each
    /// selected pollutant's `*_capture` companion column.
    fn filter_pollutants(
        self,
        pollutant: &PollutantFilter,
        keep_capture: bool,
    ) -> PolarsResult<DataFrame>;

    /// Pivots from one column per pollutant to one row per
    /// (site, timestamp, pollutant), tagged with `pollutant` and `value`
    /// columns. Capture columns do not survive the pivot.
    fn to_narrow(self) -> PolarsResult<DataFrame>;
}

impl AirFrameExt for DataFrame {
    fn filter_sites(self, codes: &[String]) -> PolarsResult<DataFrame> {
        let wanted: Vec<String> = codes.iter().map(|code| code.to_uppercase()).collect();
        let wanted = Series::new("code".into(), wanted);
        self.lazy()
            .filter(col("code").str().to_uppercase().is_in(lit(wanted)))
            .collect()
    }

    fn filter_pollutants(
        self,
        pollutant: &PollutantFilter,
        keep_capture: bool,
    ) -> PolarsResult<DataFrame> {
        if matches!(pollutant, PollutantFilter::All) {
            return Ok(self);
        }
        let selection: Vec<String> = self
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| {
                if is_id_column(name) {
                    return true;
                }
                if let Some(stem) = name.strip_suffix(CAPTURE_SUFFIX) {
                    return keep_capture && pollutant.selects(stem);
                }
                pollutant.selects(name)
            })
            .collect();
        self.select(selection)
    }

    fn to_narrow(self) -> PolarsResult<DataFrame> {
        let ids: Vec<String> = self
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| is_id_column(name))
            .collect();
        let values: Vec<String> = self
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| !is_id_column(name) && !name.ends_with(CAPTURE_SUFFIX))
            .collect();
        if values.is_empty() {
            return Ok(self);
        }

        let mut narrow = self.unpivot(values, ids)?;
        narrow.rename("variable", "pollutant".into())?;

        let sort_by: Vec<&str> = ["code", "date", "pollutant"]
            .into_iter()
            .filter(|key| {
                narrow
                    .get_column_names()
                    .iter()
                    .any(|name| name.as_str() == *key)
            })
            .collect();
        narrow.sort(sort_by, SortMultipleOptions::default())
    }
}
