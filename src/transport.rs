//! The remote fetch collaborator: resolves one fully-qualified identifier to
//! the decompressed bytes of the published file.

use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("No file published at {0}")]
    NotFound(String),

    // Covers errors during download stream processing and decompression
    #[error("Data download or decompression failed")]
    DownloadIo(#[from] std::io::Error),
}

/// Fetches one remote resource.
///
/// Implementations return the decompressed file contents; callers never see
/// the transfer encoding. The production implementation is [`HttpSource`];
/// tests substitute an in-memory source.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP transport with streaming gzip decompression.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(url.to_string(), e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        let response = response.error_for_status().map_err(|e| {
            if let Some(status) = e.status() {
                FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                }
            } else {
                FetchError::Network(url.to_string(), e)
            }
        })?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(BufReader::new(stream_reader));
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).await?;
        info!(
            "Downloaded and decompressed {} bytes from {}",
            decompressed.len(),
            url
        );
        Ok(decompressed)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory transport keyed by full URL. Unknown URLs behave like files
    /// the publisher never uploaded.
    pub(crate) struct StaticSource {
        files: HashMap<String, Vec<u8>>,
        hits: AtomicUsize,
    }

    impl StaticSource {
        pub(crate) fn new() -> Self {
            Self {
                files: HashMap::new(),
                hits: AtomicUsize::new(0),
            }
        }

        pub(crate) fn with(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
            self.files.insert(url.into(), bytes.into());
            self
        }

        pub(crate) fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.files
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(url.to_string()))
        }
    }
}
