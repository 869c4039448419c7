//! Core library for receipt ingestion and categorization.
//!
//! This crate provides:
//! - A text-extraction boundary over an external OCR capability
//! - Receipt text parsing (title/body split with title-casing)
//! - Keyword-based category classification over an ordered rule table
//! - A category aggregate ledger with create-on-demand and
//!   delete-on-empty semantics
//! - An ingestion coordinator that keeps record and aggregate state
//!   consistent, including rollback on partial failure

pub mod error;
pub mod ingest;
pub mod ledger;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod store;

pub use error::{ExtractionError, RecitError, Result, StoreError};
pub use ingest::{IngestCoordinator, IngestOutcome, IngestStage, RejectReason, RemoveOutcome};
pub use ledger::CategoryLedger;
pub use models::{CategoryEntry, CategoryStyle, IngestConfig, RecitConfig, Record, RecordDraft, RecordId};
pub use ocr::TextExtractor;
#[cfg(feature = "native")]
pub use ocr::PureTextExtractor;
pub use receipt::{CategoryClassifier, CategoryRule, ParsedReceipt, ReceiptParser, DEFAULT_CATEGORY};
pub use store::{JsonStore, MemoryStore, RecordStore};
