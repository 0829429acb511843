//! Process-local datastore used in development and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use nextcoffee_core::StoreRecord;

use crate::coffee_stores::CoffeeStoreRow;

/// A mutex-guarded map with the same semantics as the Postgres queries.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<HashMap<String, CoffeeStoreRow>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, store: &StoreRecord) -> CoffeeStoreRow {
        let mut rows = self.lock();
        rows.entry(store.id.clone())
            .or_insert_with(|| {
                let now = Utc::now();
                CoffeeStoreRow {
                    id: store.id.clone(),
                    name: store.name.clone(),
                    address: store.address.clone(),
                    neighbourhood: store.neighbourhood.clone(),
                    img_url: store.img_url.clone(),
                    distance: store.distance.max(0.0),
                    voting: 0,
                    created_at: now,
                    updated_at: now,
                }
            })
            .clone()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<CoffeeStoreRow> {
        self.lock().get(id).cloned()
    }

    pub fn increment_vote(&self, id: &str) -> Option<CoffeeStoreRow> {
        let mut rows = self.lock();
        let row = rows.get_mut(id)?;
        row.voting += 1;
        row.updated_at = Utc::now();
        Some(row.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic mid-update cannot leave a row half-written, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CoffeeStoreRow>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
