//! Configuration types for media-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Top-level library configuration
///
/// All fields have sensible defaults; `Config::default()` yields a downloader
/// that searches `PATH` for an accelerator and retries transient HTTP failures.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// External accelerator settings
    #[serde(default)]
    pub accelerator: AcceleratorConfig,

    /// Retry policy for the streaming HTTP fallback
    #[serde(default)]
    pub retry: RetryConfig,

    /// Directory for temporary files (default: "./temp")
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

/// External accelerator configuration
///
/// Groups settings for the external downloader binary. Used as a nested
/// sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcceleratorConfig {
    /// Path to the accelerator executable (auto-detected if None)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Whether to search PATH for the accelerator if no explicit path is set (default: true)
    ///
    /// With `path` unset and this disabled, every download uses the streaming
    /// fallback directly.
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_path: true,
        }
    }
}

/// Retry configuration for transient failures on the streaming path
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial request (default: 10)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds (default: 400)
    #[serde(default = "default_initial_delay", with = "duration_ms_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries, in milliseconds (default: 60 000)
    #[serde(default = "default_max_delay", with = "duration_ms_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_millis(400),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(400)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// Duration serialization helper (millisecond granularity)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // --- Defaults ---

    #[test]
    fn default_config_searches_path_with_no_explicit_binary() {
        let config = Config::default();

        assert!(config.accelerator.path.is_none());
        assert!(config.accelerator.search_path);
        assert_eq!(config.temp_dir, PathBuf::from("./temp"));
    }

    #[test]
    fn default_retry_matches_documented_policy() {
        let retry = RetryConfig::default();

        assert_eq!(retry.max_attempts, 10);
        assert_eq!(retry.initial_delay, Duration::from_millis(400));
        assert_eq!(retry.max_delay, Duration::from_secs(60));
        assert_eq!(retry.backoff_multiplier, 2.0);
        assert!(!retry.jitter);
    }

    // --- Serde ---

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");

        assert!(config.accelerator.search_path);
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.temp_dir, PathBuf::from("./temp"));
    }

    #[test]
    fn retry_delays_round_trip_through_millisecond_json() {
        let retry = RetryConfig {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(1500),
            ..Default::default()
        };

        let json = serde_json::to_string(&retry).expect("serialize failed");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse failed");
        assert_eq!(parsed["initial_delay"], 250);
        assert_eq!(parsed["max_delay"], 1500);

        let back: RetryConfig = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(back.initial_delay, Duration::from_millis(250));
        assert_eq!(back.max_delay, Duration::from_millis(1500));
    }

    #[test]
    fn accelerator_path_deserializes_from_string() {
        let config: Config =
            serde_json::from_str(r#"{"accelerator": {"path": "/opt/aria2/bin/aria2c"}}"#)
                .expect("deserialize failed");

        assert_eq!(
            config.accelerator.path,
            Some(PathBuf::from("/opt/aria2/bin/aria2c"))
        );
        // Unmentioned fields still take their defaults
        assert!(config.accelerator.search_path);
    }
}
