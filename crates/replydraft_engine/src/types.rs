use std::fmt;
use std::str::FromStr;

use replydraft_core::DraftId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One draft's generation settled.
    GenerationCompleted {
        draft_id: DraftId,
        result: Result<String, GenerationError>,
    },
    /// Every request of a batch has settled.
    BatchFinished { drafted: usize, failed: usize },
}

/// One `(id, text)` pair returned by a combined batch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReply {
    pub draft_id: DraftId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    MissingApiKey,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    EmptyResponse,
    MissingFromBatch,
    BatchUnsupported,
    TaskAborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MissingApiKey => write!(f, "missing api key"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::EmptyResponse => write!(f, "empty response"),
            FailureKind::MissingFromBatch => write!(f, "missing from batch response"),
            FailureKind::BatchUnsupported => write!(f, "batch generation unsupported"),
            FailureKind::TaskAborted => write!(f, "generation task aborted"),
        }
    }
}

/// How "generate all" talks to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatchMode {
    /// One concurrent call per draft.
    #[default]
    PerItem,
    /// A single call carrying every draft of the batch.
    Combined,
}

impl FromStr for BatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-item" | "per_item" | "peritem" => Ok(BatchMode::PerItem),
            "combined" => Ok(BatchMode::Combined),
            other => Err(format!("unknown batch mode '{other}' (expected per-item or combined)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub batch_mode: BatchMode,
}
