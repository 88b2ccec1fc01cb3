//! Download orchestration
//!
//! One [`MediaDownloader`] serves any number of download calls. Each call is
//! a single state machine run: skip if the destination exists, try the
//! external accelerator when the probe reports it available, fall back to
//! the streaming HTTP path on accelerator failure, then apply artwork
//! post-processing. A request only fails when both transports fail.
//!
//! Calls for distinct destinations are independent; the downloader holds no
//! lock serializing them, so callers wanting parallelism spawn one task per
//! file. The destination file is exclusively owned by its in-flight request
//! by construction: the two transports for one request run strictly in
//! sequence, never concurrently.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

use crate::accelerator::{Accelerator, CliAccelerator, NoOpAccelerator};
use crate::artwork;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::progress;
use crate::stream::StreamClient;
use crate::types::{ArtworkSettings, DownloadRequest, TransferOutcome};
use crate::utils::temp_file_path;

/// Resilient single-file downloader
///
/// Cheap to share: wrap it in an [`Arc`] and clone the handle into each
/// download task.
pub struct MediaDownloader {
    config: Config,
    accelerator: Arc<dyn Accelerator>,
    stream: StreamClient,
}

impl MediaDownloader {
    /// Create a downloader, resolving the accelerator from the configuration
    ///
    /// An explicitly configured binary path wins; otherwise the system PATH
    /// is searched when `search_path` is enabled. Without either, every
    /// download goes straight to the streaming path.
    pub fn new(config: Config) -> Result<Self> {
        let accelerator: Arc<dyn Accelerator> =
            if let Some(ref binary_path) = config.accelerator.path {
                // Use explicitly configured binary path
                Arc::new(CliAccelerator::new(binary_path.clone()))
            } else if config.accelerator.search_path {
                // Search PATH for the accelerator binary
                CliAccelerator::from_path()
                    .map(|a| Arc::new(a) as Arc<dyn Accelerator>)
                    .unwrap_or_else(|| Arc::new(NoOpAccelerator))
            } else {
                // No binary configured and PATH search disabled
                Arc::new(NoOpAccelerator)
            };

        info!(accelerator = accelerator.name(), "Accelerator initialized");

        Self::with_accelerator(config, accelerator)
    }

    /// Create a downloader with a caller-supplied accelerator
    ///
    /// Bypasses configuration-based resolution; used to inject a custom or
    /// mock [`Accelerator`] implementation.
    pub fn with_accelerator(config: Config, accelerator: Arc<dyn Accelerator>) -> Result<Self> {
        let stream = StreamClient::new(config.retry.clone())?;
        Ok(Self {
            config,
            accelerator,
            stream,
        })
    }

    /// The accelerator this downloader routes through
    pub fn accelerator(&self) -> &Arc<dyn Accelerator> {
        &self.accelerator
    }

    /// The configuration this downloader was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download one file to its final destination
    ///
    /// Idempotent: when the destination already exists as a regular file the
    /// call is a no-op returning [`TransferOutcome::Skipped`] without any
    /// network or subprocess activity. Parent directories are created before
    /// either transport writes.
    ///
    /// After a successful transfer, artwork post-processing runs when the
    /// request carries [`ArtworkSettings`] with `resize` set. A failure in
    /// that step is logged and swallowed: the file was obtained, so the
    /// download still succeeds.
    ///
    /// # Errors
    ///
    /// Fails only when the destination path is unusable or both transports
    /// fail; the error describes the final streaming failure.
    pub async fn download(&self, request: &DownloadRequest) -> Result<TransferOutcome> {
        let destination = &request.destination;

        if destination.is_file() {
            debug!(path = ?destination, "Destination already exists, skipping download");
            return Ok(TransferOutcome::Skipped);
        }

        let filename = destination
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("destination '{}' has no filename", destination.display()),
                ))
            })?;

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create destination directory '{}': {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let outcome = self.transfer(request, &filename).await?;

        if let Some(artwork) = &request.artwork
            && artwork.resize
        {
            self.post_process_artwork(destination, *artwork).await;
        }

        Ok(outcome)
    }

    /// Run the two-strategy transfer for one request
    ///
    /// Accelerator strictly precedes streaming; the streaming error is the
    /// one surfaced when both fail.
    async fn transfer(
        &self,
        request: &DownloadRequest,
        filename: &str,
    ) -> Result<TransferOutcome> {
        if self.accelerator.is_available().await {
            if request.progress {
                progress::announce(filename, request.indent);
            }

            match self
                .accelerator
                .fetch(&request.url, &request.destination, &request.headers)
                .await
            {
                Ok(()) => {
                    debug!(url = %request.url, "Accelerated download complete");
                    return Ok(TransferOutcome::Accelerated);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        url = %request.url,
                        "Accelerated download failed, falling back to streaming"
                    );
                }
            }
        }

        self.stream
            .fetch(
                &request.url,
                &request.destination,
                &request.headers,
                request.progress,
                request.indent,
            )
            .await?;
        Ok(TransferOutcome::Streamed)
    }

    /// Re-encode downloaded artwork, logging and swallowing failures
    ///
    /// Image work is CPU-bound, so it runs on the blocking pool.
    async fn post_process_artwork(&self, path: &Path, settings: ArtworkSettings) {
        let target = path.to_path_buf();
        let result = spawn_blocking(move || artwork::process_artwork(&target, &settings)).await;

        match result {
            Ok(Ok(())) => {
                debug!(path = ?path, "Artwork post-processing complete");
            }
            Ok(Err(e)) => {
                warn!(
                    path = ?path,
                    error = %e,
                    "Artwork post-processing failed, keeping the file as downloaded"
                );
            }
            Err(e) => {
                warn!(
                    path = ?path,
                    error = %e,
                    "Artwork post-processing task panicked, keeping the file as downloaded"
                );
            }
        }
    }

    /// Download a file to a unique path under the configured temp directory
    ///
    /// The generated name is random hex, optionally suffixed with
    /// `.extension`. Returns the path the file landed at.
    pub async fn download_to_temp(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        extension: Option<&str>,
        progress: bool,
        indent: usize,
    ) -> Result<PathBuf> {
        let location = temp_file_path(&self.config.temp_dir, extension);
        let request = DownloadRequest {
            url: url.to_string(),
            destination: location.clone(),
            headers: headers.clone(),
            progress,
            indent,
            artwork: None,
        };
        self.download(&request).await?;
        Ok(location)
    }

    /// Write a byte buffer to a unique path under the configured temp
    /// directory and return that path
    pub async fn save_to_temp(&self, content: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let location = temp_file_path(&self.config.temp_dir, None);
        tokio::fs::write(&location, content).await?;
        Ok(location)
    }
}
