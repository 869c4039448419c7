//! Ingestion pipeline: orchestration of extract, validate, parse,
//! classify, and persist.

mod coordinator;

pub use coordinator::IngestCoordinator;

use crate::error::RecitError;
use crate::models::RecordId;

/// Stage of one ingestion attempt.
///
/// Stages run strictly in declaration order; `Settled` is terminal and a
/// new attempt always starts fresh from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Idle,
    Extracting,
    Validating,
    Parsing,
    Classifying,
    Persisting,
    Settled,
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Parsing => "parsing",
            Self::Classifying => "classifying",
            Self::Persisting => "persisting",
            Self::Settled => "settled",
        };
        f.write_str(name)
    }
}

/// Why a scan was rejected without touching persisted state.
///
/// Rejection is an expected outcome, not a system error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Recognized text was shorter than the configured minimum.
    ScanTooShort { length: usize, minimum: usize },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanTooShort { length, minimum } => write!(
                f,
                "recognized text too short: {} characters (minimum {})",
                length, minimum
            ),
        }
    }
}

/// Terminal outcome of one ingestion attempt.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Record persisted and ledger updated.
    Success(RecordId),
    /// Scan did not qualify; nothing persisted.
    Rejected(RejectReason),
    /// Pipeline error; no inconsistent state left behind.
    Failed(RecitError),
}

impl IngestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The created record id, if the attempt succeeded.
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            Self::Success(id) => Some(id),
            _ => None,
        }
    }
}

/// Terminal outcome of one record removal.
#[derive(Debug)]
pub enum RemoveOutcome {
    Success,
    Failed(RecitError),
}

impl RemoveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
