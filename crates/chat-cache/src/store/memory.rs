//! In-memory key-value store.
//!
//! Keeps entries in key order so prefix scans are a range walk. Counts
//! writes and erases for observability, and can be switched into an
//! unavailable state to exercise failure handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chat_core::{KeyValueStore, StoreError, StoreResult};
use parking_lot::Mutex;

/// Operation counters of a [`MemoryStore`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub reads: u64,
    pub writes: u64,
    pub erases: u64,
}

/// Key-value store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    reads: AtomicU64,
    writes: AtomicU64,
    erases: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Make every subsequent operation fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.reads.load(Ordering::SeqCst),
            writes: self.writes.load(Ordering::SeqCst),
            erases: self.erases.load(Ordering::SeqCst),
        }
    }

    /// Raw bytes under `key`, bypassing the counters
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn erase(&self, key: &str) -> StoreResult<()> {
        self.check_available()?;
        self.erases.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.lock();
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
