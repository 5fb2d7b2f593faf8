//! List state - the in-memory copy of one fetched collection.
//!
//! A `ListState` is a cheap handle; clones share the same list. The list keeps server
//! order and holds at most one record per key. After a successful write the caller
//! applies the server's response here instead of re-fetching.

use super::filter::{self, FilterCriteria};
use crate::api::{RemoteClient, Transport};
use crate::entities::Record;
use crate::errors::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

/// Shared, ordered, key-unique list of records
#[derive(Debug)]
pub struct ListState<R> {
    items: Arc<RwLock<Vec<R>>>,
}

impl<R> Clone for ListState<R> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<R: Record> Default for ListState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ListState<R> {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Fetches the collection and replaces the list with it.
    ///
    /// On failure the current contents are left untouched.
    pub async fn refresh<T: Transport>(&self, client: &RemoteClient<T>) -> Result<usize> {
        info!("Refreshing {} list...", R::LABEL);
        let records = client.fetch_list::<R>().await?;
        Ok(self.replace_all(records).await)
    }

    /// Replaces the whole list, keeping the first record of any duplicated key.
    pub async fn replace_all(&self, records: Vec<R>) -> usize {
        let mut seen = HashSet::with_capacity(records.len());
        let unique: Vec<R> = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.key());
                if !fresh {
                    warn!("Dropping duplicate {} {}", R::LABEL, record.key());
                }
                fresh
            })
            .collect();

        let mut items = self.items.write().await;
        *items = unique;
        info!("{} list now holds {} records.", R::LABEL, items.len());
        trace!("{} list contents: {:?}", R::LABEL, items);
        items.len()
    }

    /// Applies a record returned by a write: replaces the entry with the same key in
    /// place, or appends it.
    pub async fn upsert(&self, record: R) {
        let key = record.key();
        let mut items = self.items.write().await;
        if let Some(existing) = items.iter_mut().find(|r| r.key() == key) {
            debug!("Replacing {} {} in list", R::LABEL, key);
            *existing = record;
        } else {
            debug!("Appending {} {} to list", R::LABEL, key);
            items.push(record);
        }
    }

    /// Removes the record with `key`. Returns whether one was removed.
    pub async fn remove(&self, key: &str) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|r| r.key() != key);
        let removed = items.len() != before;
        if !removed {
            debug!("No {} {} in list to remove", R::LABEL, key);
        }
        removed
    }

    /// Record with `key`, if present.
    pub async fn get(&self, key: &str) -> Option<R> {
        self.items
            .read()
            .await
            .iter()
            .find(|r| r.key() == key)
            .cloned()
    }

    /// Copy of the whole list.
    pub async fn snapshot(&self) -> Vec<R> {
        self.items.read().await.clone()
    }

    /// The records matching `criteria`, in list order.
    pub async fn filtered(&self, criteria: &FilterCriteria) -> Vec<R> {
        filter::apply(&self.items.read().await, criteria)
    }

    /// Number of records.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the list is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}
