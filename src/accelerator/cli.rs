//! CLI-based accelerator using an external aria2c binary

use super::traits::Accelerator;
use crate::error::AcceleratorError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Probe has not run yet
const PROBE_UNKNOWN: u8 = 0;
/// Probe succeeded; the binary is usable
const PROBE_AVAILABLE: u8 = 1;
/// Probe failed or availability was invalidated
const PROBE_UNAVAILABLE: u8 = 2;

/// Upper bound for the `--version` probe process
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Substring expected in the probe's stdout (case-insensitive match)
const VERSION_SIGNATURE: &str = "aria2 version";

/// CLI-based accelerator spawning an external `aria2c` binary
///
/// The handler owns a cached tri-state availability: unknown until the first
/// probe, then settled to available or unavailable. A settled state is never
/// re-probed; [`invalidate`](Accelerator::invalidate) settles it to
/// unavailable when the binary disappears mid-flight.
///
/// # Examples
///
/// ```no_run
/// use media_dl::accelerator::{Accelerator, CliAccelerator};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() {
/// // Create with explicit path
/// let accelerator = CliAccelerator::new(PathBuf::from("/usr/bin/aria2c"));
///
/// // Or auto-discover from PATH
/// let accelerator = CliAccelerator::from_path().expect("aria2c not found in PATH");
///
/// assert!(accelerator.is_available().await || !accelerator.is_available().await);
/// # }
/// ```
pub struct CliAccelerator {
    binary_path: PathBuf,
    availability: AtomicU8,
}

impl CliAccelerator {
    /// Create a new CLI accelerator with an explicit binary path
    ///
    /// The binary is not probed here; the first
    /// [`is_available`](Accelerator::is_available) call does that.
    ///
    /// # Arguments
    ///
    /// * `binary_path` - Path to the aria2c binary
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            availability: AtomicU8::new(PROBE_UNKNOWN),
        }
    }

    /// Attempt to find aria2c in PATH
    ///
    /// Uses the `which` crate to search for the `aria2c` binary in the system PATH.
    ///
    /// # Returns
    ///
    /// `Some(CliAccelerator)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("aria2c").ok().map(Self::new)
    }

    /// Path of the wrapped binary
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Run `<binary> --version` and check the output signature
    ///
    /// Available means: the process spawned, exited zero within the timeout,
    /// and printed the expected version signature. Everything else counts as
    /// unavailable.
    async fn probe(&self) -> bool {
        let result = tokio::time::timeout(
            Duration::from_secs(PROBE_TIMEOUT_SECS),
            Command::new(&self.binary_path).arg("--version").output(),
        )
        .await;

        match result {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
                let available = output.status.success() && stdout.contains(VERSION_SIGNATURE);
                debug!(
                    binary = ?self.binary_path,
                    available,
                    status = ?output.status.code(),
                    "accelerator probe finished"
                );
                available
            }
            Ok(Err(e)) => {
                debug!(binary = ?self.binary_path, error = %e, "accelerator probe failed to spawn");
                false
            }
            Err(_) => {
                warn!(
                    binary = ?self.binary_path,
                    timeout_secs = PROBE_TIMEOUT_SECS,
                    "accelerator probe timed out"
                );
                false
            }
        }
    }

    /// Remove a zero-byte partial left behind by a failed invocation
    ///
    /// Non-empty partials are kept: the external tool resumes them on the next
    /// run via its continue flag.
    async fn cleanup_empty_partial(destination: &Path) {
        if let Ok(metadata) = tokio::fs::metadata(destination).await
            && metadata.is_file()
            && metadata.len() == 0
            && let Err(e) = tokio::fs::remove_file(destination).await
        {
            warn!(path = ?destination, error = %e, "failed to remove empty partial file");
        }
    }
}

/// Build the full argument vector for one accelerated transfer
///
/// Kept separate from the spawn so the exact invocation stays inspectable:
/// output placement first, then the fixed tuning/behavior/console flags, one
/// `--header` per entry (sorted by name for a stable vector), and the URL as
/// the final positional argument.
fn build_args(
    destination_dir: &Path,
    filename: &OsStr,
    headers: &HashMap<String, String>,
    url: &str,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        OsString::from("--dir"),
        destination_dir.into(),
        OsString::from("--out"),
        filename.into(),
        OsString::from("--max-connection-per-server=8"),
        OsString::from("--min-split-size=1M"),
        OsString::from("--split=8"),
        OsString::from("--continue=true"),
        OsString::from("--auto-file-renaming=false"),
        OsString::from("--allow-overwrite=true"),
        OsString::from("--console-log-level=warn"),
        OsString::from("--show-console-readout=false"),
        OsString::from("--summary-interval=0"),
    ];

    let mut sorted: Vec<(&String, &String)> = headers.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    for (name, value) in sorted {
        args.push(OsString::from(format!("--header={name}: {value}")));
    }

    args.push(OsString::from(url));
    args
}

#[async_trait]
impl Accelerator for CliAccelerator {
    async fn is_available(&self) -> bool {
        match self.availability.load(Ordering::SeqCst) {
            PROBE_AVAILABLE => true,
            PROBE_UNAVAILABLE => false,
            _ => {
                // Two tasks racing here both probe and store the same verdict;
                // only a settled state must never probe again
                let available = self.probe().await;
                let state = if available {
                    PROBE_AVAILABLE
                } else {
                    PROBE_UNAVAILABLE
                };
                self.availability.store(state, Ordering::SeqCst);
                available
            }
        }
    }

    async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        headers: &HashMap<String, String>,
    ) -> crate::Result<()> {
        let filename = destination.file_name().ok_or_else(|| {
            crate::Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("destination has no filename: {}", destination.display()),
            ))
        })?;
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let args = build_args(dir, filename, headers, url);
        debug!(binary = ?self.binary_path, url = %url, out = ?filename, "invoking accelerator");

        match Command::new(&self.binary_path).args(&args).output().await {
            Ok(output) if output.status.success() => {
                debug!(url = %url, path = ?destination, "accelerated transfer complete");
                Ok(())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(
                    url = %url,
                    status = ?output.status.code(),
                    stderr = %stderr,
                    "accelerator exited with failure"
                );
                Self::cleanup_empty_partial(destination).await;
                Err(AcceleratorError::Failed {
                    status: output.status.code(),
                    stderr,
                }
                .into())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Binary vanished after a successful probe; settle the cache
                // so later downloads skip straight to the fallback
                self.invalidate();
                warn!(
                    binary = ?self.binary_path,
                    "accelerator binary disappeared, marking unavailable"
                );
                Err(AcceleratorError::BinaryMissing {
                    path: self.binary_path.clone(),
                }
                .into())
            }
            Err(e) => Err(AcceleratorError::SpawnFailed {
                path: self.binary_path.clone(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn invalidate(&self) {
        self.availability.store(PROBE_UNAVAILABLE, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "cli-aria2c"
    }
}
