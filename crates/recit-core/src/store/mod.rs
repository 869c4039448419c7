//! Persistent store interface and implementations.

mod json;
mod memory;
mod state;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::{CategoryEntry, Record, RecordDraft, RecordId};

/// Persistence boundary for records and category entries.
///
/// Implementations are single-writer resources: callers serialize mutations
/// (the coordinator holds its write lock across a record write and the
/// paired ledger update). Each method is an individual atomic operation -
/// it either fully applies or leaves the store unchanged.
pub trait RecordStore: Send + Sync {
    /// Persist a draft, assigning and returning its id.
    fn create_record(&self, draft: RecordDraft) -> Result<RecordId, StoreError>;

    /// Fetch a record by id.
    fn get_record(&self, id: &RecordId) -> Result<Option<Record>, StoreError>;

    /// Delete a record. Errors with [`StoreError::RecordNotFound`] if absent.
    fn delete_record(&self, id: &RecordId) -> Result<(), StoreError>;

    /// All records, newest first (`created_at` descending).
    fn list_records(&self) -> Result<Vec<Record>, StoreError>;

    /// Create a category entry. Errors with
    /// [`StoreError::DuplicateCategory`] if the title is already present
    /// (case-insensitively).
    fn create_category_entry(&self, entry: CategoryEntry) -> Result<(), StoreError>;

    /// Replace the count of an existing entry.
    fn update_category_entry(&self, title: &str, new_count: u64) -> Result<(), StoreError>;

    /// Delete a category entry by title.
    fn delete_category_entry(&self, title: &str) -> Result<(), StoreError>;

    /// All category entries.
    fn list_category_entries(&self) -> Result<Vec<CategoryEntry>, StoreError>;
}
