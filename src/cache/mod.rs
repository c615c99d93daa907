//! Two-tier, TTL-bounded, file-persisted caching
//!
//! A single `TtlCache` abstraction owns both the in-memory view and its
//! persistence; TTL is a constructor parameter, not ad hoc arithmetic at call
//! sites. Three namespaces exist:
//!
//! - coordinates: resolved centers, no expiry, cleared explicitly
//! - responses: raw upstream responses keyed by content hash, 24 h TTL
//! - provinces: assembled per-province results, 4 h TTL
//!
//! Expired entries are purged lazily on read. Every mutation persists the
//! whole map; single-process use is assumed (concurrent processes can lose
//! updates but never tear a file, thanks to rename-on-write).

pub mod store;

use crate::constants::cache as settings;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use store::{CacheStore, FileStore};

/// A cached payload with its write time in epoch milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(flatten)]
    pub payload: Value,
    pub timestamp: i64,
}

/// A cache namespace: in-memory map plus its persistence backend
pub struct TtlCache {
    store: Box<dyn CacheStore>,
    entries: BTreeMap<String, CacheEntry>,
    ttl: Option<Duration>,
}

impl TtlCache {
    /// Create a cache over the given store, loading existing entries eagerly
    ///
    /// `ttl: None` means entries never expire.
    pub fn new(store: Box<dyn CacheStore>, ttl: Option<Duration>) -> Result<Self> {
        let entries = store.load()?;
        Ok(Self {
            store,
            entries,
            ttl,
        })
    }

    /// Open a file-backed cache under `dir`
    pub fn open(dir: &Path, file_name: &str, ttl: Option<Duration>) -> Result<Self> {
        Self::new(Box::new(FileStore::new(dir.join(file_name))), ttl)
    }

    /// The coordinate cache: no expiry, invalidation is manual
    pub fn coordinates(dir: &Path) -> Result<Self> {
        Self::open(dir, settings::COORDINATES_CACHE_FILE, None)
    }

    /// The raw upstream response cache, 24 h TTL
    pub fn responses(dir: &Path) -> Result<Self> {
        Self::open(
            dir,
            settings::RESPONSES_CACHE_FILE,
            Some(Duration::from_secs(settings::RESPONSE_TTL_SECS)),
        )
    }

    /// The assembled per-province result cache, 4 h TTL
    pub fn provinces(dir: &Path) -> Result<Self> {
        Self::open(
            dir,
            settings::PROVINCES_CACHE_FILE,
            Some(Duration::from_secs(settings::PROVINCE_TTL_SECS)),
        )
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Drop every entry older than the TTL; returns whether anything changed
    fn purge_expired(&mut self) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let cutoff = Self::now_millis() - ttl.as_millis() as i64;
        let before = self.entries.len();
        self.entries.retain(|_, e| e.timestamp > cutoff);
        self.entries.len() != before
    }

    /// Look up a key, purging expired entries first
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        if self.purge_expired() {
            if let Err(e) = self.store.persist(&self.entries) {
                tracing::warn!("Failed to persist cache after purge: {}", e);
            }
        }
        self.entries.get(key).map(|e| &e.payload)
    }

    /// Typed lookup; entries that fail to deserialize are treated as misses
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    /// Insert a payload stamped with the current time and persist
    ///
    /// Payloads must serialize to JSON objects; the timestamp is flattened
    /// into the same map on disk.
    pub fn set(&mut self, key: &str, payload: &impl Serialize) -> Result<()> {
        self.set_with_timestamp(key, payload, Self::now_millis())
    }

    /// Insert with an explicit timestamp (backfill and TTL tests)
    pub fn set_with_timestamp(
        &mut self,
        key: &str,
        payload: &impl Serialize,
        timestamp: i64,
    ) -> Result<()> {
        let payload = serde_json::to_value(payload)?;
        if !payload.is_object() {
            return Err(Error::Cache(format!(
                "cache payloads must be JSON objects, key {} got {}",
                key,
                type_name(&payload)
            )));
        }
        self.entries
            .insert(key.to_string(), CacheEntry { payload, timestamp });
        self.store.persist(&self.entries)
    }

    /// Remove every entry and persist the empty map
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.store.persist(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize a name or address into a cache-key component
pub fn normalize_key_part(part: &str) -> String {
    part.trim().to_lowercase()
}

/// Cache key for a resolved coordinate: `name_address` (or city when no
/// address is known)
pub fn coordinate_key(name: &str, address_or_city: &str) -> String {
    format!(
        "{}_{}",
        normalize_key_part(name),
        normalize_key_part(address_or_city)
    )
}
