use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A normalized security finding extracted from one delivered event.
///
/// Constructed once per invocation and immutable afterward. Never
/// persisted in this form; only its enriched derivative is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub title: String,
    /// Kept as a JSON number so integer severities stay integers all the
    /// way through score arithmetic and serialization.
    pub severity: Number,
    pub description: String,
}

/// A finding plus derived fields, ready to persist and alert on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFinding {
    pub id: String,
    pub title: String,
    pub severity: Number,
    pub description: String,
    /// URLs found in the description, first-appearance order, duplicates kept.
    pub urls: Vec<String>,
    /// severity * (1 + urls.len())
    pub score: Number,
    /// The original event detail, retained verbatim for forensics.
    pub raw: Value,
}

/// Claim ticket kept by the dedup store. One row per distinct finding id,
/// inserted at most once, never updated or deleted by this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupRecord {
    pub finding_id: String,
    pub claimed_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Processed,
    Skipped,
}

/// Synchronous result of one pipeline invocation — the invocation's sole
/// visible surface besides operator logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: Status,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn processed(id: impl Into<String>) -> Self {
        Self {
            status: Status::Processed,
            id: id.into(),
            reason: None,
        }
    }

    pub fn skipped(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: Status::Skipped,
            id: id.into(),
            reason: Some(reason.into()),
        }
    }
}
