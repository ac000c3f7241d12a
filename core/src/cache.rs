//! Process-wide cache of fetched client records.
//!
//! Purely a performance layer: records are immutable after the batch
//! load, so staleness cannot occur and there is no TTL. The only
//! mutations are population on miss and the explicit invalidate calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::{ClientId, ClientRecord};

/// Cloneable handle to a shared record cache. Parallel request handlers
/// each own their store connection but share one of these.
#[derive(Clone, Default)]
pub struct RecordCache {
    inner: Arc<RwLock<HashMap<ClientId, ClientRecord>>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cached record, if any. Always a deep copy.
    pub fn get(&self, client_id: &str) -> Option<ClientRecord> {
        self.read().get(client_id).cloned()
    }

    /// Insert-if-absent: two racing misses both compute the same value
    /// from the immutable store, and the first write wins. Returns a
    /// snapshot of whichever record the cache holds afterwards.
    pub fn insert_if_absent(&self, client_id: &str, record: ClientRecord) -> ClientRecord {
        let mut map = self.write();
        map.entry(client_id.to_string()).or_insert(record).clone()
    }

    pub fn invalidate(&self, client_id: &str) {
        self.write().remove(client_id);
    }

    pub fn invalidate_all(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn cached_ids(&self) -> Vec<ClientId> {
        self.read().keys().cloned().collect()
    }

    // A poisoned lock only means another thread panicked mid-access; the
    // map itself is still a valid cache of immutable records.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ClientId, ClientRecord>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ClientId, ClientRecord>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
