//! Shared in-memory state backing the store implementations.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{CategoryEntry, Record, RecordDraft, RecordId};

/// Record and category state, shared by [`MemoryStore`](super::MemoryStore)
/// and [`JsonStore`](super::JsonStore).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreState {
    next_id: u64,
    records: Vec<Record>,
    categories: Vec<CategoryEntry>,
}

impl StoreState {
    pub(crate) fn create_record(&mut self, draft: RecordDraft) -> RecordId {
        let id = RecordId::new(format!("r{:06}", self.next_id));
        self.next_id += 1;
        self.records.push(draft.into_record(id.clone()));
        id
    }

    pub(crate) fn get_record(&self, id: &RecordId) -> Option<Record> {
        self.records.iter().find(|r| &r.id == id).cloned()
    }

    pub(crate) fn delete_record(&mut self, id: &RecordId) -> Result<(), StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        self.records.remove(idx);
        Ok(())
    }

    pub(crate) fn list_records(&self) -> Vec<Record> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub(crate) fn create_category_entry(&mut self, entry: CategoryEntry) -> Result<(), StoreError> {
        if self.categories.iter().any(|c| c.matches(&entry.title)) {
            return Err(StoreError::DuplicateCategory(entry.title));
        }
        self.categories.push(entry);
        Ok(())
    }

    pub(crate) fn update_category_entry(
        &mut self,
        title: &str,
        new_count: u64,
    ) -> Result<(), StoreError> {
        let entry = self
            .categories
            .iter_mut()
            .find(|c| c.matches(title))
            .ok_or_else(|| StoreError::CategoryNotFound(title.to_string()))?;
        entry.count = new_count;
        Ok(())
    }

    pub(crate) fn delete_category_entry(&mut self, title: &str) -> Result<(), StoreError> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.matches(title))
            .ok_or_else(|| StoreError::CategoryNotFound(title.to_string()))?;
        self.categories.remove(idx);
        Ok(())
    }

    pub(crate) fn list_category_entries(&self) -> Vec<CategoryEntry> {
        self.categories.clone()
    }
}
