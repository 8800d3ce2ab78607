//! In-memory store, used by the `memory` backend and in tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SearchFilter, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Draft, Resource},
};

struct Records<E> {
    rows: BTreeMap<i32, E>,
    next_id: i32,
}

/// Process-local storage for one resource type. Ids start at 1 and are
/// never reused.
pub struct MemoryStore<E> {
    records: RwLock<Records<E>>,
}

impl<E: Resource> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<E: Resource> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Resource> Store<E> for MemoryStore<E> {
    async fn find_all(&self, filter: &SearchFilter) -> AppResult<Vec<E>> {
        let records = self.records.read().await;
        Ok(records
            .rows
            .values()
            .filter(|record| filter.matches(*record))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<E>> {
        Ok(self.records.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, draft: Draft<E>) -> AppResult<E> {
        let mut records = self.records.write().await;

        let id = match draft.id {
            Some(id) if records.rows.contains_key(&id) => id,
            Some(_) => return Err(AppError::not_found::<E>()),
            None => {
                let id = records.next_id;
                records.next_id += 1;
                id
            }
        };

        let record = E::from_data(id, draft.data);
        records.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.records.write().await.rows.remove(&id).is_some())
    }
}
