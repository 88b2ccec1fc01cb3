//! Streaming HTTP transfer path
//!
//! This is the fallback used when the external accelerator is unavailable or
//! fails: a plain GET streamed to disk in small chunks, with retry on
//! transient server conditions. Incomplete files never survive a failed
//! attempt; a scope guard removes the partial even when the transfer future
//! is dropped mid-write.

use std::collections::HashMap;
use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::error::{Error, Result, TransferError};
use crate::progress::TransferProgress;
use crate::retry::download_with_retry;

/// Buffered-write granularity for the streaming path
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// Statuses treated as transient server conditions worth retrying.
/// Everything else outside 2xx fails the transfer immediately.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// HTTP client for the streaming fallback path
///
/// Holds one connection-pooled `reqwest` client for the life of the
/// downloader. Certificate verification is disabled so that hosts with
/// broken or self-signed chains (common on media CDNs) still transfer.
pub struct StreamClient {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl StreamClient {
    /// Create a client with the given retry policy
    pub fn new(retry: RetryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client, retry })
    }

    /// Download `url` to `destination`, retrying transient failures
    ///
    /// Each attempt recreates the destination from scratch, so a retry never
    /// appends to a half-written file. When every attempt fails with a
    /// retryable status the error reports the total number of requests made.
    ///
    /// # Arguments
    ///
    /// * `headers` - Extra request headers, applied to every attempt
    /// * `progress` - Render a console progress bar while streaming
    /// * `indent` - Leading columns for the progress display
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        headers: &HashMap<String, String>,
        progress: bool,
        indent: usize,
    ) -> Result<()> {
        let outcome = download_with_retry(&self.retry, || {
            self.attempt(url, destination, headers, progress, indent)
        })
        .await;

        match outcome {
            Err(Error::Transfer(TransferError::RetryableStatus { status, url })) => {
                Err(Error::Transfer(TransferError::RetriesExhausted {
                    status,
                    url,
                    attempts: self.retry.max_attempts + 1,
                }))
            }
            other => other,
        }
    }

    /// One transfer attempt: request, stream to disk, fsync
    async fn attempt(
        &self,
        url: &str,
        destination: &Path,
        headers: &HashMap<String, String>,
        progress: bool,
        indent: usize,
    ) -> Result<()> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let error = if RETRYABLE_STATUSES.contains(&code) {
                TransferError::RetryableStatus {
                    status: code,
                    url: url.to_string(),
                }
            } else {
                TransferError::FatalStatus {
                    status: code,
                    url: url.to_string(),
                }
            };
            return Err(error.into());
        }

        let total = response.content_length();
        debug!(url = %url, path = ?destination, ?total, "Streaming download started");

        let reporter = TransferProgress::start(total, indent, progress);

        // Guard declared before the file handle so it drops after the handle
        // is closed, letting the partial be removed on every platform
        let mut guard = PartialGuard::new(destination);
        let file = File::create(destination).await?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            reporter.advance(chunk.len() as u64);
        }

        writer.flush().await?;
        let file = writer.into_inner();
        file.sync_all().await?;

        guard.disarm();
        reporter.finish();
        debug!(path = ?destination, "Streaming download complete");
        Ok(())
    }
}

/// Removes the partially written destination unless disarmed
///
/// Drop-based so the cleanup also runs if the transfer future is cancelled
/// partway through the write loop.
struct PartialGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    /// Call once the file on disk is complete
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialGuard<'_> {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = std::fs::remove_file(self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = ?self.path, error = %e, "Failed to remove partial download");
        }
    }
}
