//! Data models for records, categories, and configuration.

pub mod category;
pub mod config;
pub mod record;

pub use category::{CategoryEntry, CategoryStyle};
pub use config::{IngestConfig, OcrConfig, RecitConfig, StoreConfig};
pub use record::{Record, RecordDraft, RecordId};
