//! Client lookup service: existence checks and cached full-record
//! fetches.

use log::debug;

use crate::cache::RecordCache;
use crate::error::{CoreError, CoreResult};
use crate::store::ClientStore;
use crate::types::ClientRecord;

/// Lookup front end over a store connection plus a shared record cache.
pub struct ClientDirectory {
    store: ClientStore,
    cache: RecordCache,
}

impl ClientDirectory {
    pub fn new(store: ClientStore) -> Self {
        Self {
            store,
            cache: RecordCache::new(),
        }
    }

    /// Share a cache across directories (one per request-handling
    /// thread).
    pub fn with_cache(store: ClientStore, cache: RecordCache) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &ClientStore {
        &self.store
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Cheap membership check. Never touches or populates the cache: the
    /// full record may be very wide and an existence probe must not pay
    /// for it.
    pub fn exists(&self, client_id: &str) -> CoreResult<bool> {
        if client_id.is_empty() {
            return Err(CoreError::EmptyClientId);
        }
        self.store.client_exists(client_id)
    }

    /// Full record fetch, cache-first. Every return is a deep-copy
    /// snapshot: callers may mutate their copy freely.
    pub fn fetch(&self, client_id: &str) -> CoreResult<ClientRecord> {
        if client_id.is_empty() {
            return Err(CoreError::EmptyClientId);
        }
        if let Some(record) = self.cache.get(client_id) {
            debug!("cache hit for client {client_id}");
            return Ok(record);
        }
        let record = self
            .store
            .fetch_client(client_id)?
            .ok_or_else(|| CoreError::ClientNotFound {
                client_id: client_id.to_string(),
            })?;
        debug!("cached client {client_id} ({} fields)", record.len());
        Ok(self.cache.insert_if_absent(client_id, record))
    }

    /// Column-equality search; filter columns are validated against the
    /// live schema. Results bypass the cache.
    pub fn search(&self, filters: &[(String, String)]) -> CoreResult<Vec<ClientRecord>> {
        self.store.search_clients(filters)
    }

    pub fn invalidate(&self, client_id: &str) {
        self.cache.invalidate(client_id);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
