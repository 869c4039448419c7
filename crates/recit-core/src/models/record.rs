//! Persisted record model for scanned receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier, assigned by the store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A persisted scanned receipt.
///
/// Immutable after creation except through explicit deletion; `category`
/// is fixed at creation time and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier, assigned by the store.
    pub id: RecordId,

    /// First recognized line, title-cased. May be empty if recognition
    /// produced no lines.
    pub title: String,

    /// Remaining recognized text, title-cased per line.
    pub body: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Category label assigned at creation.
    pub category: String,

    /// Compressed (JPEG) scan payload, if retained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

/// A record awaiting persistence - everything but the store-assigned id.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub category: String,
    pub image: Option<Vec<u8>>,
}

impl RecordDraft {
    /// Attach the store-assigned id, producing the persisted form.
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            title: self.title,
            body: self.body,
            created_at: self.created_at,
            category: self.category,
            image: self.image,
        }
    }
}
