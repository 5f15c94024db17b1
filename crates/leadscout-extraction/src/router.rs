//! Primary→fallback extraction routing.
//!
//! The routing logic is an explicit two-step state machine
//! (TryPrimary → TryFallback → Failed) rather than nested error handlers:
//! backend responses are non-deterministic, but failure classification and
//! ordering must be deterministic and testable with fake backends.
//!
//! Bounded cost: at most two backend calls per record, each bounded by a
//! timeout. The router never returns an error to the caller — failures
//! surface as `ExtractionResult::Failure` values.

use std::sync::Arc;
use std::time::Duration;

use leadscout_common::{AbstractRecord, ProfileDraft};
use leadscout_llm::audit::ExtractionAuditEntry;
use leadscout_llm::backend::ExtractionBackend;
use serde::Serialize;
use tracing::{debug, warn};

use crate::parser::parse_draft;
use crate::prompt::build_extraction_prompt;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Why an extraction failed, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PrimaryError,
    FallbackError,
    BothFailed,
    ParseError,
}

/// Outcome of routing one record. Produced once per record per run.
#[derive(Debug, Clone)]
pub enum ExtractionResult {
    Success {
        draft: ProfileDraft,
        /// Name of the backend that produced the draft.
        backend: String,
    },
    Failure {
        reason: FailureReason,
        /// Backends attempted, in routing order.
        attempted: Vec<String>,
    },
}

/// How a single attempt failed. Transport covers API errors and timeouts;
/// Parse means the backend answered but the output had no usable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptFailure {
    Transport,
    Parse,
}

pub struct ExtractionRouter {
    primary: Arc<dyn ExtractionBackend>,
    fallback: Option<Arc<dyn ExtractionBackend>>,
    timeout: Duration,
}

impl ExtractionRouter {
    pub fn new(
        primary: Arc<dyn ExtractionBackend>,
        fallback: Option<Arc<dyn ExtractionBackend>>,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route one record: try the primary backend, then at most one fallback
    /// attempt with the same prompt.
    pub async fn extract(&self, record: &AbstractRecord) -> ExtractionResult {
        let prompt = build_extraction_prompt(&record.text);
        let mut attempted = vec![self.primary.name().to_string()];

        let primary_failure = match self.attempt(self.primary.as_ref(), &prompt, record).await {
            Ok(draft) => {
                return ExtractionResult::Success {
                    draft,
                    backend: self.primary.name().to_string(),
                }
            }
            Err(kind) => kind,
        };

        let Some(fallback) = self.fallback.as_deref() else {
            return ExtractionResult::Failure {
                reason: match primary_failure {
                    AttemptFailure::Parse => FailureReason::ParseError,
                    AttemptFailure::Transport => FailureReason::PrimaryError,
                },
                attempted,
            };
        };

        attempted.push(fallback.name().to_string());
        warn!(
            record_id = %record.id,
            primary = self.primary.name(),
            fallback = fallback.name(),
            "Primary extraction failed, attempting fallback"
        );

        match self.attempt(fallback, &prompt, record).await {
            Ok(draft) => ExtractionResult::Success {
                draft,
                backend: fallback.name().to_string(),
            },
            Err(fallback_failure) => ExtractionResult::Failure {
                reason: classify(primary_failure, fallback_failure),
                attempted,
            },
        }
    }

    /// One bounded backend call plus draft parse.
    async fn attempt(
        &self,
        backend: &dyn ExtractionBackend,
        prompt: &str,
        record: &AbstractRecord,
    ) -> Result<ProfileDraft, AttemptFailure> {
        let t0 = std::time::Instant::now();

        let raw = match tokio::time::timeout(self.timeout, backend.generate(prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                self.audit(backend, record, None, t0);
                warn!(record_id = %record.id, backend = backend.name(), error = %e, "Backend call failed");
                return Err(AttemptFailure::Transport);
            }
            Err(_) => {
                self.audit(backend, record, None, t0);
                warn!(record_id = %record.id, backend = backend.name(), "Backend call timed out");
                return Err(AttemptFailure::Transport);
            }
        };

        self.audit(backend, record, Some(&raw), t0);

        parse_draft(&raw).map_err(|e| {
            warn!(record_id = %record.id, backend = backend.name(), error = %e, "Output failed schema parsing");
            AttemptFailure::Parse
        })
    }

    fn audit(
        &self,
        backend: &dyn ExtractionBackend,
        record: &AbstractRecord,
        output: Option<&str>,
        t0: std::time::Instant,
    ) {
        let entry = ExtractionAuditEntry::new(
            record.id,
            backend.name(),
            backend.model_id(),
            output,
            t0.elapsed().as_millis() as u64,
        );
        debug!(
            backend = %entry.backend,
            model = %entry.model,
            succeeded = entry.succeeded,
            latency_ms = entry.latency_ms,
            output_hash = %entry.output_hash,
            "Extraction attempt audited"
        );
    }
}

/// Deterministic failure classification after both attempts failed.
fn classify(primary: AttemptFailure, fallback: AttemptFailure) -> FailureReason {
    match (primary, fallback) {
        (AttemptFailure::Parse, AttemptFailure::Parse) => FailureReason::ParseError,
        (AttemptFailure::Transport, AttemptFailure::Transport) => FailureReason::BothFailed,
        // Primary answered garbage, fallback could not answer at all.
        (AttemptFailure::Parse, AttemptFailure::Transport) => FailureReason::FallbackError,
        // Primary never answered; the fallback's unusable output decides.
        (AttemptFailure::Transport, AttemptFailure::Parse) => FailureReason::ParseError,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
