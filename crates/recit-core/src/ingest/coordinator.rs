//! Ingestion coordinator - drives one scan through the pipeline and owns
//! all writes to the store and ledger.

use std::sync::Arc;

use chrono::Utc;
use image::DynamicImage;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::ledger::CategoryLedger;
use crate::models::{IngestConfig, RecordDraft, RecordId};
use crate::ocr::TextExtractor;
use crate::receipt::{CategoryClassifier, ReceiptParser};
use crate::store::RecordStore;

use super::{IngestOutcome, IngestStage, RejectReason, RemoveOutcome};

/// Orchestrates `extract -> validate -> parse -> classify -> persist` for
/// one scan at a time and mirrors the protocol for deletion.
///
/// The store and ledger are single-writer resources: every mutation runs
/// under one internal lock, so concurrent attempts queue their `Persisting`
/// stages instead of interleaving. A record write and its paired ledger
/// update happen with no suspension point between them, so a cancelled
/// attempt either mutated nothing or settled completely.
pub struct IngestCoordinator<X: TextExtractor, S: RecordStore> {
    extractor: X,
    store: Arc<S>,
    parser: ReceiptParser,
    classifier: CategoryClassifier,
    ledger: CategoryLedger<S>,
    config: IngestConfig,
    write_lock: Mutex<()>,
}

impl<X: TextExtractor, S: RecordStore> IngestCoordinator<X, S> {
    /// Create a coordinator over `store`, classifying with `classifier`.
    pub fn new(extractor: X, store: Arc<S>, classifier: CategoryClassifier, config: IngestConfig) -> Self {
        let ledger = CategoryLedger::new(Arc::clone(&store), classifier.clone());
        Self {
            extractor,
            store,
            parser: ReceiptParser::new(),
            classifier,
            ledger,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// The shared store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The category ledger.
    pub fn ledger(&self) -> &CategoryLedger<S> {
        &self.ledger
    }

    /// Ingest an ordered batch of images as one record.
    pub async fn ingest(&self, images: Vec<DynamicImage>) -> IngestOutcome {
        // Extracting - the only suspension point before persistence.
        debug!(stage = %IngestStage::Extracting, images = images.len(), "ingestion stage");

        let payload_source = if self.config.store_image {
            images.first().cloned()
        } else {
            None
        };

        let text = match self.extractor.extract(images).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "text extraction failed");
                return IngestOutcome::Failed(e.into());
            }
        };

        // Validating
        let length = text.chars().count();
        debug!(stage = %IngestStage::Validating, chars = length, "ingestion stage");
        if length < self.config.min_scan_length {
            info!(length, minimum = self.config.min_scan_length, "scan rejected");
            return IngestOutcome::Rejected(RejectReason::ScanTooShort {
                length,
                minimum: self.config.min_scan_length,
            });
        }

        // Parsing
        debug!(stage = %IngestStage::Parsing, "ingestion stage");
        let parsed = self.parser.parse(&text);

        // Classifying
        debug!(stage = %IngestStage::Classifying, "ingestion stage");
        let category = self.classifier.classify(&parsed.combined());

        // Persisting - serialized against every other mutation.
        debug!(stage = %IngestStage::Persisting, %category, "ingestion stage");

        let _guard = self.write_lock.lock().await;

        let image = match payload_source {
            Some(source) => match compress_image(&source, self.config.image_quality) {
                Ok(bytes) => Some(bytes),
                Err(e) => return IngestOutcome::Failed(e.into()),
            },
            None => None,
        };

        let draft = RecordDraft {
            title: parsed.title,
            body: parsed.body,
            created_at: Utc::now(),
            category: category.clone(),
            image,
        };

        let id = match self.store.create_record(draft) {
            Ok(id) => id,
            Err(e) => return IngestOutcome::Failed(e.into()),
        };

        if let Err(ledger_err) = self.ledger.on_record_added(&category) {
            // The record write committed but the aggregate did not: undo the
            // record so readers never see a count that disagrees with the
            // record set.
            if let Err(del_err) = self.store.delete_record(&id) {
                error!(record = %id, error = %del_err, "rollback of orphaned record failed");
            }
            return IngestOutcome::Failed(ledger_err.into());
        }

        info!(record = %id, %category, "scan ingested");
        IngestOutcome::Success(id)
    }

    /// Remove a record and decrement its category aggregate.
    ///
    /// Deletion is the dominant intent: if the ledger decrement fails after
    /// the record delete committed, the failure is surfaced but the record
    /// is not restored.
    pub async fn remove_record(&self, id: &RecordId) -> RemoveOutcome {
        let _guard = self.write_lock.lock().await;

        let record = match self.store.get_record(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                return RemoveOutcome::Failed(
                    StoreError::RecordNotFound(id.to_string()).into(),
                );
            }
            Err(e) => return RemoveOutcome::Failed(e.into()),
        };

        if let Err(e) = self.store.delete_record(id) {
            return RemoveOutcome::Failed(e.into());
        }

        if let Err(e) = self.ledger.on_record_removed(&record.category) {
            warn!(record = %id, error = %e, "record deleted but ledger update failed");
            return RemoveOutcome::Failed(e.into());
        }

        info!(record = %id, category = %record.category, "record removed");
        RemoveOutcome::Success
    }
}

/// Re-encode a scan as JPEG at the given quality.
fn compress_image(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    use image::codecs::jpeg::JpegEncoder;

    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};

    use pretty_assertions::assert_eq;

    use crate::error::{ExtractionError, RecitError};
    use crate::models::CategoryEntry;
    use crate::store::MemoryStore;

    use super::*;

    /// Extractor returning a fixed text, standing in for the OCR engine.
    struct StaticExtractor(String);

    impl StaticExtractor {
        fn new(text: &str) -> Self {
            Self(text.to_string())
        }
    }

    impl TextExtractor for StaticExtractor {
        fn extract(
            &self,
            _images: Vec<DynamicImage>,
        ) -> impl Future<Output = Result<String, ExtractionError>> + Send {
            let text = self.0.clone();
            async move { Ok(text) }
        }
    }

    /// Extractor that always fails.
    struct BrokenExtractor;

    impl TextExtractor for BrokenExtractor {
        fn extract(
            &self,
            _images: Vec<DynamicImage>,
        ) -> impl Future<Output = Result<String, ExtractionError>> + Send {
            async { Err(ExtractionError::Recognition("engine offline".to_string())) }
        }
    }

    /// Store wrapper that can be told to fail category mutations.
    struct FlakyStore {
        inner: MemoryStore,
        fail_category_writes: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                fail_category_writes: AtomicBool::new(false),
            }
        }

        fn fail_category_writes(&self, fail: bool) {
            self.fail_category_writes.store(fail, Ordering::SeqCst);
        }

        fn category_failure(&self) -> Result<(), StoreError> {
            if self.fail_category_writes.load(Ordering::SeqCst) {
                Err(StoreError::Backend("injected category failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl RecordStore for FlakyStore {
        fn create_record(&self, draft: RecordDraft) -> Result<RecordId, StoreError> {
            self.inner.create_record(draft)
        }

        fn get_record(&self, id: &RecordId) -> Result<Option<crate::models::Record>, StoreError> {
            self.inner.get_record(id)
        }

        fn delete_record(&self, id: &RecordId) -> Result<(), StoreError> {
            self.inner.delete_record(id)
        }

        fn list_records(&self) -> Result<Vec<crate::models::Record>, StoreError> {
            self.inner.list_records()
        }

        fn create_category_entry(&self, entry: CategoryEntry) -> Result<(), StoreError> {
            self.category_failure()?;
            self.inner.create_category_entry(entry)
        }

        fn update_category_entry(&self, title: &str, new_count: u64) -> Result<(), StoreError> {
            self.category_failure()?;
            self.inner.update_category_entry(title, new_count)
        }

        fn delete_category_entry(&self, title: &str) -> Result<(), StoreError> {
            self.category_failure()?;
            self.inner.delete_category_entry(title)
        }

        fn list_category_entries(&self) -> Result<Vec<CategoryEntry>, StoreError> {
            self.inner.list_category_entries()
        }
    }

    fn coordinator<X: TextExtractor, S: RecordStore>(
        extractor: X,
        store: Arc<S>,
    ) -> IngestCoordinator<X, S> {
        let config = IngestConfig {
            store_image: false,
            ..IngestConfig::default()
        };
        IngestCoordinator::new(extractor, store, CategoryClassifier::default(), config)
    }

    const RECEIPT: &str = "Countdown Auckland\nMILK 2L - $6.50\nBREAD - $3.80";

    #[tokio::test]
    async fn successful_ingest_creates_record_and_entry() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        let id = outcome.record_id().expect("ingest should succeed").clone();

        let record = store.get_record(&id).unwrap().unwrap();
        assert_eq!(record.title, "Countdown Auckland");
        assert_eq!(record.body, "Milk 2l - $6.50\nBread - $3.80");
        assert_eq!(record.category, "Groceries");

        let entry = coordinator.ledger().lookup("Groceries").unwrap().unwrap();
        assert_eq!(entry.count, 1);
    }

    #[tokio::test]
    async fn scan_below_threshold_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let text = "a".repeat(19);
        let coordinator = coordinator(StaticExtractor::new(&text), Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        match outcome {
            IngestOutcome::Rejected(RejectReason::ScanTooShort { length, minimum }) => {
                assert_eq!(length, 19);
                assert_eq!(minimum, 20);
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        assert!(store.list_records().unwrap().is_empty());
        assert!(store.list_category_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scan_at_threshold_proceeds() {
        let store = Arc::new(MemoryStore::new());
        let text = "a".repeat(20);
        let coordinator = coordinator(StaticExtractor::new(&text), Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        assert!(outcome.is_success());
        assert_eq!(store.list_records().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn extraction_failure_mutates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(BrokenExtractor, Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        assert!(matches!(
            outcome,
            IngestOutcome::Failed(RecitError::Extraction(_))
        ));
        assert!(store.list_records().unwrap().is_empty());
        assert!(store.list_category_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_failure_rolls_back_record_write() {
        let store = Arc::new(FlakyStore::new());
        store.fail_category_writes(true);
        let coordinator = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        assert!(matches!(outcome, IngestOutcome::Failed(_)));

        // Compensating delete: no orphaned record without an aggregate.
        assert!(store.list_records().unwrap().is_empty());
        assert!(store.list_category_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_last_record_removes_category_entry() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));

        let outcome = coordinator.ingest(Vec::new()).await;
        let id = outcome.record_id().unwrap().clone();

        let removed = coordinator.remove_record(&id).await;
        assert!(removed.is_success());
        assert!(store.list_records().unwrap().is_empty());
        assert!(coordinator.ledger().lookup("Groceries").unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_of_unknown_record_fails() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));

        let outcome = coordinator.remove_record(&RecordId::from("r424242")).await;
        assert!(matches!(outcome, RemoveOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn failed_ledger_decrement_does_not_restore_record() {
        let store = Arc::new(FlakyStore::new());
        let coordinator = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));

        let id = coordinator
            .ingest(Vec::new())
            .await
            .record_id()
            .unwrap()
            .clone();

        store.fail_category_writes(true);
        let outcome = coordinator.remove_record(&id).await;

        // Deletion is the dominant intent: failure surfaced, record gone.
        assert!(matches!(outcome, RemoveOutcome::Failed(_)));
        assert!(store.list_records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_match_record_set_after_mixed_operations() {
        let store = Arc::new(MemoryStore::new());
        let grocery = coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store));
        let retail = coordinator(
            StaticExtractor::new("Cotton On Queen St\nTEE - $12.00, PANTS - $23.99"),
            Arc::clone(&store),
        );

        let a = grocery.ingest(Vec::new()).await.record_id().unwrap().clone();
        grocery.ingest(Vec::new()).await.record_id().unwrap();
        retail.ingest(Vec::new()).await.record_id().unwrap();

        assert!(grocery.remove_record(&a).await.is_success());

        let records = store.list_records().unwrap();
        for entry in store.list_category_entries().unwrap() {
            let assigned = records
                .iter()
                .filter(|r| r.category.eq_ignore_ascii_case(&entry.title))
                .count() as u64;
            assert_eq!(entry.count, assigned, "count drifted for {}", entry.title);
            assert!(entry.count > 0, "zero-count entry for {}", entry.title);
        }

        assert_eq!(store.list_category_entries().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_ingests_serialize_their_writes() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = Arc::new(coordinator(StaticExtractor::new(RECEIPT), Arc::clone(&store)));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let coordinator = Arc::clone(&coordinator);
            handles.push(tokio::spawn(async move {
                coordinator.ingest(Vec::new()).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_success());
        }

        assert_eq!(store.list_records().unwrap().len(), 4);
        let entry = coordinator.ledger().lookup("Groceries").unwrap().unwrap();
        assert_eq!(entry.count, 4);
    }
}
