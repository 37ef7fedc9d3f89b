//! Asset download into a local file

#[cfg(test)]
use mockall::automock;

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::HTTP_TIMEOUT_MS;
use crate::install::error::AcquireError;

/// Trait for fetching a URL into a local file
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `url` to `dest`, creating or truncating the file
    async fn download(&self, url: &str, dest: &Path) -> Result<(), AcquireError>;
}

/// Downloader streaming HTTP response bodies to disk
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("setup-go-actions")
                .timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), AcquireError> {
        debug!(%url, dest = %dest.display(), "Downloading asset");

        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Asset download returned status {}: {}", status, url);
            return Err(AcquireError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, "Download finished");
        Ok(())
    }
}
