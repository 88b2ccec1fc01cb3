//! Error types for media-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Accelerator, Transfer, Artwork)
//! - A narrow, typed boundary around artwork post-processing
//! - Context information (status codes, URLs, binary paths, stderr output)

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// External accelerator invocation failed
    #[error("accelerator error: {0}")]
    Accelerator(#[from] AcceleratorError),

    /// HTTP transfer failed
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Artwork post-processing failed
    #[error("artwork error: {0}")]
    Artwork(#[from] ArtworkError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session settings store access failed
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Errors from the external download accelerator
#[derive(Debug, Error)]
pub enum AcceleratorError {
    /// The accelerator binary could not be spawned because it does not exist
    #[error("accelerator binary not found: {path}")]
    BinaryMissing {
        /// The binary path that failed to spawn
        path: PathBuf,
    },

    /// The accelerator binary could be spawned but the spawn itself failed
    #[error("failed to run accelerator {path}: {reason}")]
    SpawnFailed {
        /// The binary path that failed to spawn
        path: PathBuf,
        /// The underlying OS error message
        reason: String,
    },

    /// The accelerator process ran but exited with a failure status
    #[error("accelerator exited with status {status:?}: {stderr}")]
    Failed {
        /// The process exit code, if one was available
        status: Option<i32>,
        /// Trimmed stderr output from the process
        stderr: String,
    },

    /// No accelerator is configured or discoverable on this system
    #[error("no accelerator available")]
    Unavailable,
}

/// Errors from the streaming HTTP transfer path
#[derive(Debug, Error)]
pub enum TransferError {
    /// Server answered with a status that the retry policy treats as transient
    ///
    /// This variant only escapes the retry loop wrapped into
    /// [`TransferError::RetriesExhausted`]; callers normally never see it.
    #[error("server returned retryable status {status} for {url}")]
    RetryableStatus {
        /// The HTTP status code returned by the server
        status: u16,
        /// The URL being fetched
        url: String,
    },

    /// Server answered with an error status outside the retryable set
    #[error("server returned {status} for {url}")]
    FatalStatus {
        /// The HTTP status code returned by the server
        status: u16,
        /// The URL being fetched
        url: String,
    },

    /// The retry budget was spent without ever getting a usable response
    #[error("giving up on {url} after {attempts} attempts (last status {status})")]
    RetriesExhausted {
        /// The last HTTP status code seen before giving up
        status: u16,
        /// The URL being fetched
        url: String,
        /// Total number of requests made, including the initial attempt
        attempts: u32,
    },
}

/// Errors from artwork post-processing
///
/// Post-processing is best-effort: the orchestrator logs these and leaves the
/// downloaded file untouched rather than failing the transfer.
#[derive(Debug, Error)]
pub enum ArtworkError {
    /// Image decode, transform, or encode failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading or replacing the image file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension does not map to a known image format
    #[error("unrecognized image format for {path}")]
    UnknownFormat {
        /// The file whose format could not be determined
        path: PathBuf,
    },

    /// Two images were compared but their dimensions do not match
    #[error("image dimensions differ: {first:?} vs {second:?}")]
    DimensionMismatch {
        /// Width and height of the first image
        first: (u32, u32),
        /// Width and height of the second image
        second: (u32, u32),
    },
}

/// Errors from the session settings store
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The named module has no entry in the settings file
    #[error("module '{module}' does not use session settings")]
    UnknownModule {
        /// The module that was looked up
        module: String,
    },

    /// The settings file does not have the expected nested layout
    #[error("settings file is malformed: {reason}")]
    Malformed {
        /// What was wrong with the structure
        reason: String,
    },
}
