//! Expiring key→JSON document store on local disk.
//!
//! One record per key, one file per record. Reads never fail: a missing,
//! unreadable, malformed, or expired record is a miss. Writes happen only
//! after a fully successful fetch, so a failed fetch can never clobber a
//! valid record.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Serialize, serde::Deserialize)]
struct Record {
    fetched_at: u64,
    data: Value,
}

#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Open the cache at `root`, creating the directory eagerly.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create cache directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// Load the record for `key` if it exists, parses, and is younger than
    /// `ttl`. Every failure class is a miss.
    pub fn load<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        self.load_at(key, ttl, unix_now())
    }

    fn load_at<T: DeserializeOwned>(&self, key: &str, ttl: Duration, now: u64) -> Option<T> {
        let path = self.record_path(key).ok()?;
        let raw = fs::read_to_string(&path).ok()?;
        let record: Record = serde_json::from_str(&raw).ok()?;
        if now.saturating_sub(record.fetched_at) > ttl.as_secs() {
            debug!(key, "cache record expired");
            return None;
        }
        serde_json::from_value(record.data).ok()
    }

    /// Overwrite the record for `key` with a fresh timestamp.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.save_at(key, value, unix_now())
    }

    fn save_at<T: Serialize>(&self, key: &str, value: &T, now: u64) -> Result<()> {
        let path = self.record_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = Record {
            fetched_at: now,
            data: serde_json::to_value(value)?,
        };
        let body = serde_json::to_string_pretty(&record)?;
        fs::write(&path, body)
            .with_context(|| format!("failed to write cache record {}", path.display()))?;
        debug!(key, "cache record written");
        Ok(())
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Keys become file names, and the slug part of a key can come straight from
/// user input, so reject anything that could escape the cache root.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("cache key cannot be empty");
    }
    if key.contains('/') || key.contains('\\') {
        bail!("cache key contains a path separator");
    }
    if key == "." || key.contains("..") {
        bail!("cache key contains a path traversal component");
    }
    let first = key.chars().next().unwrap();
    if !first.is_ascii_alphanumeric() {
        bail!("cache key must start with an alphanumeric character");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        bail!("cache key contains invalid characters");
    }
    Ok(())
}
