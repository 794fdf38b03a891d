use crate::domain::model::RecordKind;
use thiserror::Error;

/// How a failure should be surfaced by a transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied a bad kind/id; surface as a client error.
    Client,
    /// Environment, configuration, or data inconsistency; surface as a
    /// server error.
    Server,
}

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("record not found: {kind}/{id}")]
    RecordNotFound { kind: RecordKind, id: String },

    #[error("rules source unavailable: {source_ref}: {reason}")]
    RulesUnavailable { source_ref: String, reason: String },

    #[error("rate card malformed: {detail}")]
    RulesMalformed { detail: String },

    #[error("rate key \"{key}\" not found in rate card (record {record_id})")]
    RateKeyNotFound { key: String, record_id: String },

    #[error("currency mismatch for record {record_id}: record has {found}, rate card declares {expected}")]
    CurrencyMismatch {
        record_id: String,
        expected: String,
        found: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ExplainError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RecordNotFound { .. } => ErrorCategory::Client,
            _ => ErrorCategory::Server,
        }
    }

    /// Whether the caller may retry without an operator fixing anything.
    /// Only a transiently unreadable rules source qualifies; the engine
    /// itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RulesUnavailable { .. } | Self::IoError(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplainError>;
