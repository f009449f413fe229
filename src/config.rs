//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::store::{LogFile, DEFAULT_CAPACITY};

pub const DEFAULT_PORT: u16 = 8099;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_URL: &str = "http://localhost:8099";
pub const DEFAULT_SCAN_INTERVAL: u64 = 30;
pub const DEFAULT_IO_TIMEOUT: u64 = 5;
pub const DEFAULT_SNAPSHOT_PREFIX: &str = "/local";

/// Allowed range for the polling interval, in seconds.
const SCAN_INTERVAL_RANGE: (u64, u64) = (10, 300);

/// Service configuration.
///
/// Every field has an environment variable; CLI flags override them in
/// `main`.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Listen port (from PORT)
    pub port: u16,
    /// Listen address (from DAF_HOST)
    pub host: String,
    /// Directory holding `events.json` (from DAF_DATA_DIR). Unset means the
    /// platform data directory, resolved only when the server needs it.
    pub data_dir: Option<PathBuf>,
    /// Maximum events kept in `today` (from DAF_MAX_EVENTS)
    pub max_events: usize,
    /// Poll interval for `watch` (from DAF_SCAN_INTERVAL)
    pub scan_interval: Duration,
    /// Persistence timeout (from DAF_IO_TIMEOUT_SECS)
    pub io_timeout: Duration,
    /// Where captured snapshots are written (from DAF_SNAPSHOT_DIR)
    pub snapshot_dir: Option<PathBuf>,
    /// Public path prefix for captured snapshots (from DAF_SNAPSHOT_PREFIX)
    pub snapshot_prefix: String,
    /// Base URL for the client subcommands (from DAF_URL)
    pub url: String,
}

impl FeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_events = parse_or(&lookup, "DAF_MAX_EVENTS", DEFAULT_CAPACITY);
        let scan_interval = parse_or(&lookup, "DAF_SCAN_INTERVAL", DEFAULT_SCAN_INTERVAL);
        let io_timeout = parse_or(&lookup, "DAF_IO_TIMEOUT_SECS", DEFAULT_IO_TIMEOUT);

        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            host: lookup("DAF_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            data_dir: lookup("DAF_DATA_DIR").map(PathBuf::from),
            max_events: max_events.max(1),
            scan_interval: clamp_scan_interval(scan_interval),
            io_timeout: Duration::from_secs(io_timeout.max(1)),
            snapshot_dir: lookup("DAF_SNAPSHOT_DIR").map(PathBuf::from),
            snapshot_prefix: lookup("DAF_SNAPSHOT_PREFIX")
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_PREFIX.to_string()),
            url: lookup("DAF_URL").unwrap_or_else(|| DEFAULT_URL.to_string()),
        }
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// The backing file for the event store.
    pub fn log_file(&self) -> Result<LogFile> {
        Ok(LogFile::in_dir(&self.data_dir()?, self.io_timeout))
    }
}

/// Clamp a polling interval in seconds to the allowed range.
pub fn clamp_scan_interval(secs: u64) -> Duration {
    let (min, max) = SCAN_INTERVAL_RANGE;
    Duration::from_secs(secs.clamp(min, max))
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "activity-feed")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn config(vars: &[(&str, &str)]) -> FeedConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FeedConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[("DAF_DATA_DIR", "/data")]);

        assert_eq!(config.port, 8099);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_events, 100);
        assert_eq!(config.scan_interval, Duration::from_secs(30));
        assert_eq!(config.io_timeout, Duration::from_secs(5));
        assert!(config.snapshot_dir.is_none());
        assert_eq!(config.snapshot_prefix, "/local");
        assert_eq!(
            config.log_file().unwrap().path(),
            Path::new("/data/events.json")
        );
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DAF_DATA_DIR", "/srv/feed"),
            ("PORT", "9000"),
            ("DAF_MAX_EVENTS", "25"),
            ("DAF_SNAPSHOT_DIR", "/config/www"),
        ]);

        assert_eq!(config.port, 9000);
        assert_eq!(config.max_events, 25);
        assert_eq!(config.snapshot_dir, Some(PathBuf::from("/config/www")));
    }

    #[test]
    fn unset_data_dir_is_left_for_the_server_to_resolve() {
        let config = config(&[("DAF_URL", "http://feed.local:8099")]);

        assert!(config.data_dir.is_none());
        assert_eq!(config.url, "http://feed.local:8099");
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config(&[("DAF_DATA_DIR", "/data"), ("PORT", "http"), ("DAF_MAX_EVENTS", "-3")]);

        assert_eq!(config.port, 8099);
        assert_eq!(config.max_events, 100);
    }

    #[test]
    fn capacity_is_at_least_one() {
        let config = config(&[("DAF_DATA_DIR", "/data"), ("DAF_MAX_EVENTS", "0")]);
        assert_eq!(config.max_events, 1);
    }

    #[test]
    fn scan_interval_is_clamped() {
        assert_eq!(clamp_scan_interval(1), Duration::from_secs(10));
        assert_eq!(clamp_scan_interval(60), Duration::from_secs(60));
        assert_eq!(clamp_scan_interval(3600), Duration::from_secs(300));
    }
}
