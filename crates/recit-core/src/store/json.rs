//! Single-file JSON store.
//!
//! The whole state is rewritten on each mutation via a temp file and an
//! atomic rename, so a crash mid-write never leaves a torn store file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::StoreError;
use crate::models::{CategoryEntry, Record, RecordDraft, RecordId};

use super::state::StoreState;
use super::RecordStore;

/// File-backed store persisting records and category entries as JSON.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreState::default()
        };

        debug!(path = %path.display(), "opened JSON store");

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))
    }

    fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `op` to a copy of the state, persist the copy, then commit it.
    /// If persisting fails the in-memory state is untouched, so a mutation
    /// never half-applies.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl RecordStore for JsonStore {
    fn create_record(&self, draft: RecordDraft) -> Result<RecordId, StoreError> {
        self.mutate(|state| Ok(state.create_record(draft)))
    }

    fn get_record(&self, id: &RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.lock()?.get_record(id))
    }

    fn delete_record(&self, id: &RecordId) -> Result<(), StoreError> {
        self.mutate(|state| state.delete_record(id))
    }

    fn list_records(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.lock()?.list_records())
    }

    fn create_category_entry(&self, entry: CategoryEntry) -> Result<(), StoreError> {
        self.mutate(|state| state.create_category_entry(entry))
    }

    fn update_category_entry(&self, title: &str, new_count: u64) -> Result<(), StoreError> {
        self.mutate(|state| state.update_category_entry(title, new_count))
    }

    fn delete_category_entry(&self, title: &str) -> Result<(), StoreError> {
        self.mutate(|state| state.delete_category_entry(title))
    }

    fn list_category_entries(&self) -> Result<Vec<CategoryEntry>, StoreError> {
        Ok(self.lock()?.list_category_entries())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::models::CategoryStyle;

    use super::*;

    fn draft(title: &str, category: &str) -> RecordDraft {
        RecordDraft {
            title: title.to_string(),
            body: "Body".to_string(),
            created_at: Utc::now(),
            category: category.to_string(),
            image: None,
        }
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let id = {
            let store = JsonStore::open(&path).unwrap();
            store
                .create_category_entry(CategoryEntry::first("Groceries", CategoryStyle::default()))
                .unwrap();
            store.create_record(draft("Countdown", "Groceries")).unwrap()
        };

        let reopened = JsonStore::open(&path).unwrap();
        let record = reopened.get_record(&id).unwrap().unwrap();
        assert_eq!(record.title, "Countdown");

        let entries = reopened.list_category_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Groceries");
    }

    #[test]
    fn ids_stay_unique_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let first = {
            let store = JsonStore::open(&path).unwrap();
            store.create_record(draft("A", "Default")).unwrap()
        };

        let store = JsonStore::open(&path).unwrap();
        let second = store.create_record(draft("B", "Default")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = JsonStore::open(&path).unwrap();
        let id = store.create_record(draft("Gone", "Default")).unwrap();
        store.delete_record(&id).unwrap();
        drop(store);

        let reopened = JsonStore::open(&path).unwrap();
        assert!(reopened.list_records().unwrap().is_empty());
    }
}
