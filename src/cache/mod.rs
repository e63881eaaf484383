//! Time-to-live response cache over a pluggable string store.

mod store;

pub use store::{FileStore, MemoryStore, Store};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cache key for one league's bundle.
#[must_use]
pub fn league_key(league_id: u64) -> String {
    format!("fpl_data_{league_id}")
}

/// What actually sits in the store: the payload plus its birth time.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord<T> {
    timestamp: DateTime<Utc>,
    data: T,
}

/// TTL cache; records older than `ttl` read as absent and are removed by
/// the access that observes the expiry.
pub struct TtlCache<S> {
    store: S,
    ttl: chrono::Duration,
}

impl<S: Store> TtlCache<S> {
    pub fn new(store: S, ttl: std::time::Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self { store, ttl }
    }

    /// Fresh payload, or `None` for a miss, a stale record, or a record
    /// that no longer deserializes (both of the latter are evicted).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;

        let record: CacheRecord<T> = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(key, error = %e, "evicting undecodable cache record");
                self.store.remove(key);
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(record.timestamp);
        if age > self.ttl {
            debug!(key, age_secs = age.num_seconds(), "evicting stale cache record");
            self.store.remove(key);
            return None;
        }

        Some(record.data)
    }

    pub fn put<T: Serialize>(&self, key: &str, data: &T) {
        let record = CacheRecord {
            timestamp: Utc::now(),
            data,
        };
        match serde_json::to_string(&record) {
            Ok(raw) => self.store.put(key, raw),
            Err(e) => warn!(key, error = %e, "cache serialization failed"),
        }
    }
}
