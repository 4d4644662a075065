//! Defines the temporal resolutions and summary statistics available from the
//! locally managed networks, and the split between the two import paths.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The temporal resolution or summary statistic of the requested data.
///
/// Raw time-series resolutions (hourly, daily and the short-period averages)
/// are published per site, while [`DataType::Annual`] and [`DataType::Monthly`]
/// are pre-computed network-wide summary statistics published per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Hour-by-hour observations.
    Hourly,
    /// Daily mean observations.
    Daily,
    /// Pre-computed monthly summary statistics.
    Monthly,
    /// Pre-computed annual summary statistics.
    Annual,
    /// 15-minute mean observations (SO2 only at most sites).
    Min15,
    /// Rolling 8-hour mean observations.
    Hour8,
    /// Rolling 24-hour mean observations.
    Hour24,
    /// Maximum daily rolling 8-hour mean observations.
    DailyMax8,
}

/// The two structurally different import paths, selected once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Network-wide summary files, one per year.
    Aggregate,
    /// Per-site data files located through the metadata catalog.
    PerSite,
}

impl DataType {
    /// Every recognised data type, in the order the publisher documents them.
    pub const ALL: [DataType; 8] = [
        DataType::Hourly,
        DataType::Daily,
        DataType::Monthly,
        DataType::Annual,
        DataType::Min15,
        DataType::Hour8,
        DataType::Hour24,
        DataType::DailyMax8,
    ];

    /// The segment used in the publisher's file names.
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            DataType::Hourly => "hourly",
            DataType::Daily => "daily",
            DataType::Monthly => "monthly",
            DataType::Annual => "annual",
            DataType::Min15 => "15_min",
            DataType::Hour8 => "8_hour",
            DataType::Hour24 => "24_hour",
            DataType::DailyMax8 => "daily_max_8",
        }
    }

    /// Which import path serves this data type.
    pub fn kind(&self) -> PathKind {
        match self {
            DataType::Annual | DataType::Monthly => PathKind::Aggregate,
            _ => PathKind::PerSite,
        }
    }
}

/// Formats a `DataType` using its file-name segment.
///
/// ```
/// use localair::DataType;
///
/// assert_eq!(DataType::Hourly.to_string(), "hourly");
/// assert_eq!(DataType::DailyMax8.to_string(), "daily_max_8");
/// ```
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Error returned when a data type string is not in the recognised enumeration.
#[derive(Debug, Clone, Error)]
#[error("unrecognised data type '{0}'")]
pub struct ParseDataTypeError(pub String);

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .find(|data_type| data_type.path_segment() == s)
            .copied()
            .ok_or_else(|| ParseDataTypeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_data_type_selects_exactly_one_path() {
        for data_type in DataType::ALL {
            let aggregate = data_type.kind() == PathKind::Aggregate;
            let per_site = data_type.kind() == PathKind::PerSite;
            assert!(aggregate ^ per_site, "{data_type} must pick one path");
        }
    }

    #[test]
    fn only_summary_statistics_use_the_aggregate_path() {
        let aggregates: Vec<DataType> = DataType::ALL
            .into_iter()
            .filter(|data_type| data_type.kind() == PathKind::Aggregate)
            .collect();
        assert_eq!(aggregates, [DataType::Monthly, DataType::Annual]);
    }

    #[test]
    fn parses_publisher_segments() {
        for data_type in DataType::ALL {
            assert_eq!(data_type.to_string().parse::<DataType>().unwrap(), data_type);
        }
    }

    #[test]
    fn rejects_unknown_segments() {
        let err = "weekly".parse::<DataType>().unwrap_err();
        assert_eq!(err.0, "weekly");
    }
}
