//! In-memory response cache for place searches
//!
//! Entries are keyed by the exact search tuple and hold the full ordered item
//! list from the provider. There is no eviction, TTL or size bound; a miss
//! followed by a fetch simply overwrites whatever was stored for the key.
//! Lookup and store are separate operations, so concurrent misses on the same
//! key each fetch upstream and the last write wins.

use std::{collections::HashMap, fmt};

use tokio::sync::RwLock;

use crate::upstream::{PlaceItem, PlaceQuery};

/// Deterministic key for a search: `lat,lng,radius,limit` with six-decimal coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(latitude: f64, longitude: f64, radius: i64, limit: i64) -> Self {
        Self(format!(
            "{},{},{},{}",
            format_coordinate(latitude),
            format_coordinate(longitude),
            radius,
            limit
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Six-decimal coordinate; values that round to zero never carry a sign
fn format_coordinate(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => unsigned.to_string(),
        _ => formatted,
    }
}

impl From<&PlaceQuery> for CacheKey {
    fn from(query: &PlaceQuery) -> Self {
        Self::new(query.latitude, query.longitude, query.radius, query.limit)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search results shared across requests, guarded by a single reader/writer lock
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, Vec<PlaceItem>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached items for `key`, if any were stored
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<PlaceItem>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store `items` under `key`, replacing any previous entry
    pub async fn put(&self, key: CacheKey, items: Vec<PlaceItem>) {
        self.entries.write().await.insert(key, items);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
