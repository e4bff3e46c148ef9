//! Time-expiring memoization of validation results.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use gfred_model::ValidationResult;

use crate::clock::{Clock, SystemClock};

struct CacheEntry {
    result: ValidationResult,
    stored_at: Instant,
}

/// Hit and miss counters for a [`ValidationCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Validation results keyed by opaque strings, valid for `timeout`.
///
/// Callers build collision-free keys, usually with [`ValidationCache::key`].
/// Expired entries read as misses but stay in memory until overwritten,
/// [`purge_expired`](Self::purge_expired) or [`clear`](Self::clear).
pub struct ValidationCache {
    entries: HashMap<String, CacheEntry>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    hits: u64,
    misses: u64,
}

impl fmt::Debug for ValidationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationCache")
            .field("entries", &self.entries.len())
            .field("timeout", &self.timeout)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

impl ValidationCache {
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, Arc::new(SystemClock))
    }

    pub fn with_clock(timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            timeout,
            clock,
            hits: 0,
            misses: 0,
        }
    }

    /// Compose a key from an entity key and its content fingerprint.
    pub fn key(entity_key: &str, fingerprint: &str) -> String {
        format!("{entity_key}:{fingerprint}")
    }

    /// Cached result for `key`, if present and younger than the timeout.
    pub fn get(&mut self, key: &str) -> Option<&ValidationResult> {
        let now = self.clock.now();
        let timeout = self.timeout;
        let fresh = self
            .entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < timeout);

        match fresh {
            Some(entry) => {
                self.hits += 1;
                Some(&entry.result)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store `result` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: impl Into<String>, result: ValidationResult) {
        let stored_at = self.clock.now();
        self.entries
            .insert(key.into(), CacheEntry { result, stored_at });
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let timeout = self.timeout;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < timeout);
        before - self.entries.len()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
