//! Fetches one remote fragment and parses it into a `DataFrame`.

use crate::observations::error::ObservationError;
use crate::transport::RemoteSource;
use polars::frame::DataFrame;
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

pub(crate) async fn load_fragment(
    source: &dyn RemoteSource,
    url: &str,
) -> Result<DataFrame, ObservationError> {
    let bytes = source.fetch(url).await?;
    csv_to_dataframe(bytes, url).await
}

/// Parses raw CSV bytes into a DataFrame using a blocking task. Column names
/// are lowercased so fragments from different providers line up on
/// concatenation.
async fn csv_to_dataframe(bytes: Vec<u8>, url: &str) -> Result<DataFrame, ObservationError> {
    let url_owned = url.to_string();

    task::spawn_blocking(move || {
        let mut temp_file = NamedTempFile::new().map_err(|e| ObservationError::CsvReadIo {
            url: url_owned.clone(),
            source: e,
        })?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| ObservationError::CsvReadIo {
                url: url_owned.clone(),
                source: e,
            })?;
        temp_file.flush().map_err(|e| ObservationError::CsvReadIo {
            url: url_owned.clone(),
            source: e,
        })?;

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
            .map_err(|e| ObservationError::CsvReadPolars {
                url: url_owned.clone(),
                source: e,
            })?
            .finish()
            .map_err(|e| ObservationError::CsvReadPolars {
                url: url_owned.clone(),
                source: e,
            })?;

        let lowered: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        df.set_column_names(lowered)
            .map_err(|e| ObservationError::CsvReadPolars {
                url: url_owned,
                source: e,
            })?;

        Ok(df)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::StaticSource;

    #[tokio::test]
    async fn parses_csv_with_lowercased_headers() -> Result<(), ObservationError> {
        let source = StaticSource::new().with(
            "https://files.test/AD1_hourly_2018.csv.gz",
            "Date,NO2,SO2,Site,Code\n2018-01-01 01:00:00,12.0,3.1,Shoeburyness,AD1\n",
        );
        let frame = load_fragment(&source, "https://files.test/AD1_hourly_2018.csv.gz").await?;
        assert_eq!(frame.height(), 1);
        let columns: Vec<&str> = frame
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(columns, ["date", "no2", "so2", "site", "code"]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_surfaces_as_a_fetch_error() {
        let source = StaticSource::new();
        let result = load_fragment(&source, "https://files.test/nope.csv.gz").await;
        assert!(matches!(
            result,
            Err(ObservationError::Fetch(crate::transport::FetchError::NotFound(_)))
        ));
    }
}
