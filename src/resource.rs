//! Remote identifiers for the files published by the locally managed
//! networks. Pure string construction; an identifier that nothing hosts
//! surfaces as a fetch failure downstream, not here.

use crate::types::data_type::DataType;

/// Root under which the locally managed network files are published.
pub const DEFAULT_BASE_URL: &str = "https://uk-air.defra.gov.uk/openair/LMAM/data";

/// Network tag embedded in the summary and metadata file names.
const NETWORK_TAG: &str = "LMAM";

const FILE_EXTENSION: &str = "csv.gz";

/// URL of a pre-computed summary statistics file. One file per year covers
/// the whole network.
pub(crate) fn summary_url(base: &str, data_type: DataType, year: i32) -> String {
    format!(
        "{base}/summary_{}_{NETWORK_TAG}_{year}.{FILE_EXTENSION}",
        data_type.path_segment()
    )
}

/// URL of one site's data file for one year, under the sub-network folder
/// that publishes it.
pub(crate) fn site_data_url(
    base: &str,
    pcode: &str,
    code: &str,
    data_type: DataType,
    year: i32,
    ratified: bool,
) -> String {
    let qualifier = if ratified { "_ratified" } else { "" };
    format!(
        "{base}/{pcode}/{}_{}_{year}{qualifier}.{FILE_EXTENSION}",
        code.to_uppercase(),
        data_type.path_segment()
    )
}

/// URL of the site metadata catalog covering the whole network.
pub(crate) fn metadata_url(base: &str) -> String {
    format!("{base}/{NETWORK_TAG}_metadata.json.gz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_urls_follow_the_publisher_pattern() {
        assert_eq!(
            summary_url("https://host/lmam", DataType::Annual, 2018),
            "https://host/lmam/summary_annual_LMAM_2018.csv.gz"
        );
        assert_eq!(
            summary_url("https://host/lmam", DataType::Monthly, 2019),
            "https://host/lmam/summary_monthly_LMAM_2019.csv.gz"
        );
    }

    #[test]
    fn site_urls_are_grouped_by_sub_network_folder() {
        assert_eq!(
            site_data_url("https://host/lmam", "lmam_ess", "ad1", DataType::Hourly, 2018, false),
            "https://host/lmam/lmam_ess/AD1_hourly_2018.csv.gz"
        );
        assert_eq!(
            site_data_url("https://host/lmam", "lmam_ess", "AD1", DataType::DailyMax8, 2020, true),
            "https://host/lmam/lmam_ess/AD1_daily_max_8_2020_ratified.csv.gz"
        );
    }

    #[test]
    fn metadata_url_is_fixed_per_base() {
        assert_eq!(
            metadata_url("https://host/lmam"),
            "https://host/lmam/LMAM_metadata.json.gz"
        );
    }
}
