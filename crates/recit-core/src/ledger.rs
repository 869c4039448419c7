//! Category aggregate ledger.
//!
//! Keeps each category entry's count equal to the number of records
//! assigned to that category: entries are created on the first record of a
//! previously-unseen category and deleted when their count reaches zero.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{CategoryEntry, CategoryStyle};
use crate::receipt::CategoryClassifier;
use crate::store::RecordStore;

/// Ledger over a shared store.
///
/// Each operation is a single store mutation, so it either fully applies
/// or leaves the ledger unchanged. Callers treat a returned error as fatal
/// to the enclosing ingestion or deletion attempt.
pub struct CategoryLedger<S: RecordStore> {
    store: Arc<S>,
    classifier: CategoryClassifier,
}

impl<S: RecordStore> CategoryLedger<S> {
    /// Create a ledger over `store`, styling new entries from `classifier`.
    pub fn new(store: Arc<S>, classifier: CategoryClassifier) -> Self {
        Self { store, classifier }
    }

    /// Account for a record created in `category`: increment the matching
    /// entry, or create one with a count of one.
    pub fn on_record_added(&self, category: &str) -> Result<(), StoreError> {
        match self.lookup(category)? {
            Some(entry) => {
                debug!(category = %entry.title, count = entry.count + 1, "incrementing category");
                self.store
                    .update_category_entry(&entry.title, entry.count + 1)
            }
            None => {
                let style = self.classifier.style_for(category);
                let title = crate::receipt::capitalize_words(category);
                debug!(category = %title, "creating category entry");
                self.store
                    .create_category_entry(CategoryEntry::first(title, style))
            }
        }
    }

    /// Account for a record removed from `category`: decrement the matching
    /// entry, deleting it when the count reaches zero. A missing entry means
    /// the invariant was already broken elsewhere; that is logged and
    /// swallowed so it never blocks the record deletion itself.
    pub fn on_record_removed(&self, category: &str) -> Result<(), StoreError> {
        match self.lookup(category)? {
            None => {
                warn!(category, "no ledger entry for removed record");
                Ok(())
            }
            Some(entry) if entry.count <= 1 => {
                debug!(category = %entry.title, "deleting emptied category");
                self.store.delete_category_entry(&entry.title)
            }
            Some(entry) => {
                debug!(category = %entry.title, count = entry.count - 1, "decrementing category");
                self.store
                    .update_category_entry(&entry.title, entry.count - 1)
            }
        }
    }

    /// Whether an entry exists for `category` (case-insensitive).
    pub fn entry_exists(&self, category: &str) -> Result<bool, StoreError> {
        Ok(self.lookup(category)?.is_some())
    }

    /// Find the entry for `category` (case-insensitive), if any.
    pub fn lookup(&self, category: &str) -> Result<Option<CategoryEntry>, StoreError> {
        Ok(self
            .store
            .list_category_entries()?
            .into_iter()
            .find(|entry| entry.matches(category)))
    }

    /// Style used when an entry for `category` would be created.
    pub fn style_for(&self, category: &str) -> CategoryStyle {
        self.classifier.style_for(category)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::store::MemoryStore;

    use super::*;

    fn ledger() -> CategoryLedger<MemoryStore> {
        CategoryLedger::new(Arc::new(MemoryStore::new()), CategoryClassifier::default())
    }

    #[test]
    fn first_record_creates_entry_with_count_one() {
        let ledger = ledger();
        ledger.on_record_added("Groceries").unwrap();

        let entry = ledger.lookup("Groceries").unwrap().unwrap();
        assert_eq!(entry.count, 1);
        assert_eq!(entry.icon, "cart");
        assert_eq!(entry.color, "green");
    }

    #[test]
    fn further_records_increment() {
        let ledger = ledger();
        ledger.on_record_added("Fuel").unwrap();
        ledger.on_record_added("Fuel").unwrap();
        ledger.on_record_added("Fuel").unwrap();

        assert_eq!(ledger.lookup("Fuel").unwrap().unwrap().count, 3);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let ledger = ledger();
        ledger.on_record_added("Groceries").unwrap();

        ledger.on_record_added("groceries").unwrap();
        assert_eq!(ledger.lookup("GROCERIES").unwrap().unwrap().count, 2);
        assert!(ledger.entry_exists("gRoCeRiEs").unwrap());
    }

    #[test]
    fn removal_decrements_and_deletes_on_zero() {
        let ledger = ledger();
        ledger.on_record_added("Retail").unwrap();
        ledger.on_record_added("Retail").unwrap();

        ledger.on_record_removed("Retail").unwrap();
        assert_eq!(ledger.lookup("Retail").unwrap().unwrap().count, 1);

        ledger.on_record_removed("Retail").unwrap();
        assert!(ledger.lookup("Retail").unwrap().is_none());
    }

    #[test]
    fn removal_of_unknown_category_is_a_no_op() {
        let ledger = ledger();
        ledger.on_record_removed("Never Seen").unwrap();
        assert!(!ledger.entry_exists("Never Seen").unwrap());
    }

    #[test]
    fn unknown_category_gets_neutral_style() {
        let ledger = ledger();
        ledger.on_record_added("mystery shop").unwrap();

        let entry = ledger.lookup("Mystery Shop").unwrap().unwrap();
        assert_eq!(entry.title, "Mystery Shop");
        assert_eq!(entry.icon, "text");
        assert_eq!(entry.color, "gray");
    }
}
