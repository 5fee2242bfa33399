//! Saved-items reconciliation: a per-owner collection of job results that
//! holds at most one entry per link.

use std::collections::BTreeMap;
use std::fmt;

use jobhunt_logging::{hunt_debug, hunt_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::JobResult;

/// Identity of the user owning saved items, supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned identifier of a saved item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedItemId(String);

impl SavedItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SavedItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: SavedItemId,
    pub owner_id: OwnerId,
    /// RFC 3339 timestamp.
    pub saved_at: String,
    pub job: JobResult,
}

/// A record the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSavedItem {
    pub owner_id: OwnerId,
    pub saved_at: String,
    pub job: JobResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("saved-items store unavailable: {0}")]
    Unavailable(String),
    #[error("saved-items store rejected the record: {0}")]
    Rejected(String),
}

/// Persisted collection of saved items.
///
/// Stores are not required to enforce `(owner, link)` uniqueness.
pub trait SavedItemStore {
    fn create(&mut self, record: NewSavedItem) -> Result<SavedItem, StoreError>;
    /// Deleting an unknown id succeeds.
    fn delete(&mut self, id: &SavedItemId) -> Result<(), StoreError>;
    fn query_by_owner(&self, owner: &OwnerId) -> Result<Vec<SavedItem>, StoreError>;
}

/// Volatile store, ids are `saved-<n>`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    next_id: u64,
    items: BTreeMap<SavedItemId, SavedItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SavedItemStore for MemoryStore {
    fn create(&mut self, record: NewSavedItem) -> Result<SavedItem, StoreError> {
        self.next_id += 1;
        let item = SavedItem {
            id: SavedItemId::new(format!("saved-{}", self.next_id)),
            owner_id: record.owner_id,
            saved_at: record.saved_at,
            job: record.job,
        };
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn delete(&mut self, id: &SavedItemId) -> Result<(), StoreError> {
        self.items.remove(id);
        Ok(())
    }

    fn query_by_owner(&self, owner: &OwnerId) -> Result<Vec<SavedItem>, StoreError> {
        Ok(self
            .items
            .values()
            .filter(|item| &item.owner_id == owner)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SavedItemsError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedItem),
    /// The owner already has an item with this link; nothing was written.
    AlreadySaved,
}

/// Produces RFC 3339 timestamps for new items.
pub type Clock = Box<dyn Fn() -> String + Send + Sync>;

struct Listing {
    owner: OwnerId,
    items: Vec<SavedItem>,
}

/// Keeps the saved collection deduplicated and answers membership queries.
pub struct SavedItems<S> {
    store: S,
    clock: Clock,
    listing: Option<Listing>,
}

impl<S: SavedItemStore> SavedItems<S> {
    pub fn new(store: S, clock: Clock) -> Self {
        Self {
            store,
            clock,
            listing: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn save(&mut self, owner: &OwnerId, job: &JobResult) -> Result<SaveOutcome, SavedItemsError> {
        // Re-list so the guard holds even if the store changed underneath us.
        let current = self.list(owner)?;
        if current.iter().any(|item| item.job.link == job.link) {
            hunt_info!("{} already saved {}", owner, job.link);
            return Ok(SaveOutcome::AlreadySaved);
        }

        let item = self.store.create(NewSavedItem {
            owner_id: owner.clone(),
            saved_at: (self.clock)(),
            job: job.clone(),
        })?;
        hunt_info!("{} saved {} as {}", owner, item.job.link, item.id);
        if let Some(listing) = self.listing.as_mut().filter(|l| &l.owner == owner) {
            listing.items.push(item.clone());
        }
        Ok(SaveOutcome::Saved(item))
    }

    pub fn remove(&mut self, id: &SavedItemId) -> Result<(), SavedItemsError> {
        self.store.delete(id)?;
        hunt_debug!("Removed saved item {}", id);
        if let Some(listing) = self.listing.as_mut() {
            listing.items.retain(|item| &item.id != id);
        }
        Ok(())
    }

    pub fn list(&mut self, owner: &OwnerId) -> Result<Vec<SavedItem>, SavedItemsError> {
        let items = self.store.query_by_owner(owner)?;
        self.listing = Some(Listing {
            owner: owner.clone(),
            items: items.clone(),
        });
        Ok(items)
    }

    pub fn contains(&mut self, owner: &OwnerId, link: &str) -> Result<bool, SavedItemsError> {
        let cached = self
            .listing
            .as_ref()
            .filter(|listing| &listing.owner == owner)
            .map(|listing| listing.items.iter().any(|item| item.job.link == link));
        match cached {
            Some(found) => Ok(found),
            None => Ok(self.list(owner)?.iter().any(|item| item.job.link == link)),
        }
    }
}
