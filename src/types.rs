//! Core types for media-dl

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A single file acquisition request
///
/// Describes everything `MediaDownloader::download` needs: where to fetch
/// from, where the file must land, and the optional presentation and
/// post-processing knobs. Build one with [`DownloadRequest::new`] and adjust
/// the public fields as needed.
#[derive(Clone, Debug)]
pub struct DownloadRequest {
    /// Source URL
    pub url: String,

    /// Final destination path, including the filename
    pub destination: PathBuf,

    /// Extra request headers, applied to both transports
    pub headers: HashMap<String, String>,

    /// Render console progress output for this transfer (default: false)
    pub progress: bool,

    /// Number of columns the progress output is indented by (default: 0)
    pub indent: usize,

    /// Artwork post-processing to apply after a successful transfer
    pub artwork: Option<ArtworkSettings>,
}

impl DownloadRequest {
    /// Create a request with default headers, no progress output, and no
    /// artwork post-processing
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            headers: HashMap::new(),
            progress: false,
            indent: 0,
            artwork: None,
        }
    }
}

/// How a completed download was satisfied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferOutcome {
    /// Destination already existed; nothing was transferred
    Skipped,
    /// Fetched by the external accelerator
    Accelerated,
    /// Fetched by the streaming HTTP fallback
    Streamed,
}

impl TransferOutcome {
    /// True when bytes actually moved (not a skip)
    pub fn transferred(&self) -> bool {
        !matches!(self, TransferOutcome::Skipped)
    }
}

impl std::fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferOutcome::Skipped => write!(f, "skipped"),
            TransferOutcome::Accelerated => write!(f, "accelerated"),
            TransferOutcome::Streamed => write!(f, "streamed"),
        }
    }
}

/// Artwork post-processing settings
///
/// Processing only happens when `resize` is set; the remaining fields shape
/// the re-encode. The downloaded file is replaced in place on success and
/// left untouched on failure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtworkSettings {
    /// Target edge length in pixels; output is always square (default: 1400)
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    /// Output format (default: jpeg)
    #[serde(default)]
    pub format: ArtworkFormat,

    /// Compression level; only meaningful for JPEG output (default: low)
    #[serde(default)]
    pub compression: CompressionLevel,

    /// Whether to process at all (default: false)
    #[serde(default)]
    pub resize: bool,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            format: ArtworkFormat::default(),
            compression: CompressionLevel::default(),
            resize: false,
        }
    }
}

fn default_resolution() -> u32 {
    1400
}

/// Target format for processed artwork
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkFormat {
    /// JPEG output; honors [`CompressionLevel`]
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    /// PNG output; always encoded at the encoder's default compression
    Png,
    /// Keep the source format, re-encoding with default settings
    Keep,
}

impl ArtworkFormat {
    /// Map a caller-supplied format name to a target format
    ///
    /// Normalizes the common `jpg` alias; names that are neither JPEG nor PNG
    /// fall back to [`ArtworkFormat::Keep`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => ArtworkFormat::Jpeg,
            "png" => ArtworkFormat::Png,
            _ => ArtworkFormat::Keep,
        }
    }
}

/// Artwork compression preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Larger files, better quality (JPEG quality 90)
    #[default]
    Low,
    /// Smaller files, reduced quality (JPEG quality 70)
    High,
}
