//! Audit entries for extraction backend calls.
//! One entry per attempt, logged by the router for observability.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionAuditEntry {
    pub id: Uuid,
    /// AbstractRecord this attempt was made for.
    pub record_id: Uuid,
    pub backend: String,
    pub model: String,
    /// SHA-256 of the raw model output; empty string for failed calls.
    pub output_hash: String,
    pub succeeded: bool,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl ExtractionAuditEntry {
    pub fn new(
        record_id: Uuid,
        backend: impl Into<String>,
        model: impl Into<String>,
        output: Option<&str>,
        latency_ms: u64,
    ) -> Self {
        let output_hash = match output {
            Some(text) => {
                let mut hasher = Sha256::new();
                hasher.update(text.as_bytes());
                format!("{:x}", hasher.finalize())
            }
            None => String::new(),
        };

        Self {
            id: Uuid::new_v4(),
            record_id,
            backend: backend.into(),
            model: model.into(),
            succeeded: output.is_some(),
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }
}
