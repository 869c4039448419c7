//! In-memory store for tests and ephemeral runs.

use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::models::{CategoryEntry, Record, RecordDraft, RecordId};

use super::state::StoreState;
use super::RecordStore;

/// Volatile store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn create_record(&self, draft: RecordDraft) -> Result<RecordId, StoreError> {
        Ok(self.lock()?.create_record(draft))
    }

    fn get_record(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.lock()?.get_record(id))
    }

    fn delete_record(&self, id: &RecordId) -> Result<(), StoreError> {
        self.lock()?.delete_record(id)
    }

    fn list_records(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.lock()?.list_records())
    }

    fn create_category_entry(&self, entry: CategoryEntry) -> Result<(), StoreError> {
        self.lock()?.create_category_entry(entry)
    }

    fn update_category_entry(&self, title: &str, new_count: u64) -> Result<(), StoreError> {
        self.lock()?.update_category_entry(title, new_count)
    }

    fn delete_category_entry(&self, title: &str) -> Result<(), StoreError> {
        self.lock()?.delete_category_entry(title)
    }

    fn list_category_entries(&self) -> Result<Vec<CategoryEntry>, StoreError> {
        Ok(self.lock()?.list_category_entries())
    }
}
