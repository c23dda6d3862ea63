use anyhow::Result;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::aggregate::AggregatedContributor;
use crate::config::CacheConfig;
use crate::error::CacheError;

mod compression;
mod key_gen;
mod storage;

pub use compression::{compress_data, decode_data};
pub use key_gen::file_stem;
pub use storage::{CacheStore, FileCacheStore, MemoryCacheStore, NoopCacheStore};

/// Snapshot of a ranked board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub contributors: Vec<AggregatedContributor>,
    /// Capture time, milliseconds since the Unix epoch
    #[serde(with = "jiff::fmt::serde::timestamp::millisecond::required")]
    pub timestamp: Timestamp,
}

impl CacheEntry {
    /// An entry is fresh while its age does not exceed `ttl`
    pub fn is_fresh(&self, now: Timestamp, ttl: Duration) -> bool {
        let age_ms = now.as_millisecond() - self.timestamp.as_millisecond();
        age_ms <= i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Typed access to the cached board under a single key
pub struct ContributorCache {
    store: Box<dyn CacheStore>,
    key: String,
    ttl: Duration,
    compress: bool,
}

impl ContributorCache {
    pub fn new(store: Box<dyn CacheStore>, key: impl Into<String>, ttl: Duration) -> Self {
        ContributorCache {
            store,
            key: key.into(),
            ttl,
            compress: false,
        }
    }

    /// Gzip entries on write. Reads accept either form.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Build the cache described by the configuration
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let store: Box<dyn CacheStore> = if config.enabled {
            let dir = config.resolve_dir()?;
            info!("Using contributor cache at {:?}", dir);
            Box::new(FileCacheStore::new(dir))
        } else {
            Box::new(NoopCacheStore)
        };

        Ok(ContributorCache::new(
            store,
            config.key.clone(),
            config.ttl.as_duration(),
        )
        .with_compression(config.compression_enabled))
    }

    /// Cache that never holds anything
    pub fn disabled() -> Self {
        ContributorCache::new(Box::new(NoopCacheStore), "", Duration::ZERO)
    }

    /// Whether the backing store can hold data at all
    pub fn is_available(&self) -> bool {
        self.store.is_persistent()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the cached board.
    ///
    /// Expired entries are skipped unless `ignore_expiry` is set; they stay
    /// in the store so a later stale fallback can still use them. Malformed
    /// entries are discarded.
    pub fn read(&self, now: Timestamp, ignore_expiry: bool) -> Option<Vec<AggregatedContributor>> {
        match self.load_entry() {
            Ok(Some(entry)) => {
                if ignore_expiry || entry.is_fresh(now, self.ttl) {
                    debug!(
                        "Cache hit with {} contributors captured at {}",
                        entry.contributors.len(),
                        entry.timestamp
                    );
                    Some(entry.contributors)
                } else {
                    debug!("Cache entry from {} has expired", entry.timestamp);
                    None
                }
            }
            Ok(None) => None,
            Err(CacheError::Malformed(e)) => {
                warn!("Discarding malformed contributor cache: {}", e);
                if let Err(e) = self.store.remove(&self.key) {
                    warn!("Failed to discard contributor cache: {:#}", e);
                }
                None
            }
            Err(e) => {
                warn!("Error reading from cache: {}", e);
                None
            }
        }
    }

    /// Load the stored entry regardless of age.
    ///
    /// Store failures are `Read` errors. Bytes that do not decode into an
    /// envelope are `Malformed`.
    pub fn load_entry(&self) -> Result<Option<CacheEntry>, CacheError> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => return Err(CacheError::Read(e.into())),
        };

        let data = decode_data(raw).map_err(|e| CacheError::Malformed(e.into()))?;
        let text = String::from_utf8(data).map_err(|e| CacheError::Malformed(e.into()))?;
        let entry = serde_json::from_str(&text).map_err(|e| CacheError::Malformed(e.into()))?;

        Ok(Some(entry))
    }

    /// Replace the cached board with `contributors` captured at `now`
    pub fn write(&self, now: Timestamp, contributors: &[AggregatedContributor]) -> Result<(), CacheError> {
        let entry = CacheEntry {
            contributors: contributors.to_vec(),
            timestamp: now,
        };

        let mut raw = serde_json::to_vec(&entry).map_err(|e| CacheError::Write(e.into()))?;
        if self.compress {
            raw = compress_data(&raw).map_err(|e| CacheError::Write(e.into()))?;
        }

        self.store
            .set(&self.key, &raw)
            .map_err(|e| CacheError::Write(e.into()))
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }
}
