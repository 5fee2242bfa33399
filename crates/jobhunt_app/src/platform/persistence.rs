use std::path::PathBuf;

use jobhunt_core::{NewSavedItem, OwnerId, SavedItem, SavedItemId, SavedItemStore, StoreError};
use jobhunt_engine::{DataDir, SAVED_ITEMS_FILE};
use jobhunt_logging::{hunt_error, hunt_info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedStore {
    next_id: u64,
    items: Vec<SavedItem>,
}

/// Saved items kept in `<data_dir>/saved_items.ron`, rewritten atomically on
/// every change.
pub struct RonFileStore {
    dir: DataDir,
    state: PersistedStore,
}

impl RonFileStore {
    pub fn open(dir: DataDir) -> Result<Self, StoreError> {
        let path = dir.file(SAVED_ITEMS_FILE);
        let text = dir.read_to_string(SAVED_ITEMS_FILE).map_err(|err| {
            StoreError::Unavailable(format!("failed to read {:?}: {}", path, err))
        })?;
        let state = match text {
            Some(text) => ron::from_str(&text).map_err(|err| {
                StoreError::Unavailable(format!("failed to parse {:?}: {}", path, err))
            })?,
            None => PersistedStore::default(),
        };
        hunt_info!("Loaded {} saved items from {:?}", state.items.len(), path);
        Ok(Self { dir, state })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.file(SAVED_ITEMS_FILE)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&self.state, pretty).map_err(|err| {
            hunt_error!("Failed to serialize saved items: {}", err);
            StoreError::Rejected(err.to_string())
        })?;
        self.dir
            .replace(SAVED_ITEMS_FILE, content.as_bytes())
            .map_err(|err| {
                hunt_error!("Failed to write saved items to {:?}: {}", self.path(), err);
                StoreError::Unavailable(err.to_string())
            })?;
        Ok(())
    }
}

impl SavedItemStore for RonFileStore {
    fn create(&mut self, record: NewSavedItem) -> Result<SavedItem, StoreError> {
        let next_id = self.state.next_id + 1;
        let item = SavedItem {
            id: SavedItemId::new(format!("saved-{next_id}")),
            owner_id: record.owner_id,
            saved_at: record.saved_at,
            job: record.job,
        };
        self.state.next_id = next_id;
        self.state.items.push(item.clone());
        if let Err(err) = self.flush() {
            self.state.items.pop();
            return Err(err);
        }
        Ok(item)
    }

    fn delete(&mut self, id: &SavedItemId) -> Result<(), StoreError> {
        let Some(index) = self.state.items.iter().position(|item| &item.id == id) else {
            return Ok(());
        };
        let removed = self.state.items.remove(index);
        if let Err(err) = self.flush() {
            self.state.items.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }

    fn query_by_owner(&self, owner: &OwnerId) -> Result<Vec<SavedItem>, StoreError> {
        Ok(self
            .state
            .items
            .iter()
            .filter(|item| &item.owner_id == owner)
            .cloned()
            .collect())
    }
}
