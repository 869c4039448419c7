//! Error types for the recit-core library.

use thiserror::Error;

/// Main error type for the recit library.
#[derive(Error, Debug)]
pub enum RecitError {
    /// Text extraction (OCR adapter) error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Persistent store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the text-extraction adapter.
///
/// The recognition engine itself is an external capability; these variants
/// only describe the ways consuming it can fail.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to load recognition models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The engine failed while recognizing text.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image input (empty batch, undecodable buffer).
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The background worker running the engine went away.
    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Errors from the persistent record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode persisted state.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A referenced record does not exist.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// A referenced category entry does not exist.
    #[error("category entry not found: {0}")]
    CategoryNotFound(String),

    /// A category entry with this title already exists.
    #[error("category entry already exists: {0}")]
    DuplicateCategory(String),

    /// Backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for the recit library.
pub type Result<T> = std::result::Result<T, RecitError>;
