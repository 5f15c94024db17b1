//! End-to-end lead pipeline.
//!
//! Orchestrates the full flow for one run:
//!   1. Extract a profile draft from each abstract (concurrent, bounded)
//!   2. Normalize drafts into canonical profiles
//!   3. Score every profile against the topic rule tables
//!   4. Rank deterministically
//!   5. Emit progress events via broadcast channel
//!
//! Extraction is the only externally-latent step and runs with bounded
//! concurrency. Normalization, scoring, and ranking are pure and run after
//! every extraction has been collected, so the final ordering never depends
//! on the order extractions complete in.
//!
//! The pipeline is non-destructive: per-record failures are logged and
//! counted, never raised. A run with zero extracted profiles is an
//! empty-result state, not an error.

use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use leadscout_common::{AbstractRecord, TopicConfig};
use leadscout_extraction::{normalize, ExtractionResult, ExtractionRouter};
use leadscout_ranker::{rank, score_profile, ScoredProfile};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadJob {
    pub topic: String,
    /// Scoring reference date; pass a fixed date for reproducible runs.
    pub as_of: NaiveDate,
    /// Concurrent extraction bound.
    pub concurrency: usize,
}

impl LeadJob {
    pub fn new(topic: impl Into<String>, as_of: NaiveDate) -> Self {
        Self {
            topic: topic.into(),
            as_of,
            concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

// ── Progress events ───────────────────────────────────────────────────────────

/// Progress event emitted during a run (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct LeadProgress {
    pub job_id: Uuid,
    pub stage: String,
    pub message: String,
    pub records_total: usize,
    pub extracted: usize,
    pub failed: usize,
}

impl LeadProgress {
    fn new(job_id: Uuid, stage: &str, message: String) -> Self {
        Self {
            job_id,
            stage: stage.to_string(),
            message,
            records_total: 0,
            extracted: 0,
            failed: 0,
        }
    }
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LeadRunResult {
    pub job_id: Uuid,
    pub topic: String,
    pub records_total: usize,
    pub extracted: usize,
    /// Records whose extraction failed on every attempted backend.
    pub extraction_failures: usize,
    /// Drafts rejected by normalization (no usable name).
    pub dropped_profiles: usize,
    /// Fully ranked, filter-ready leads.
    pub leads: Vec<ScoredProfile>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

/// Run the pipeline for one batch of records.
///
/// Progress events are sent via `progress_tx` if provided.
#[instrument(skip(records, router, config, progress_tx), fields(topic = %job.topic))]
pub async fn run_lead_pipeline(
    records: Vec<AbstractRecord>,
    router: Arc<ExtractionRouter>,
    config: &TopicConfig,
    job: LeadJob,
    progress_tx: Option<broadcast::Sender<LeadProgress>>,
) -> LeadRunResult {
    let job_id = Uuid::new_v4();
    let t0 = std::time::Instant::now();
    let records_total = records.len();

    info!(job_id = %job_id, records = records_total, "Starting lead pipeline");

    let emit = |stage: &str, msg: String, extracted: usize, failed: usize| {
        if let Some(ref tx) = progress_tx {
            let mut prog = LeadProgress::new(job_id, stage, msg);
            prog.records_total = records_total;
            prog.extracted = extracted;
            prog.failed = failed;
            let _ = tx.send(prog);
        }
    };

    emit("extract", format!("Extracting {records_total} abstracts"), 0, 0);

    // ── 1. Concurrent extraction ──────────────────────────────────────────────
    // Completion order is irrelevant: results are collected before scoring.
    let outcomes: Vec<(AbstractRecord, ExtractionResult)> = stream::iter(records)
        .map(|record| {
            let router = Arc::clone(&router);
            async move {
                let result = router.extract(&record).await;
                (record, result)
            }
        })
        .buffer_unordered(job.concurrency)
        .collect()
        .await;

    // ── 2–3. Normalize and score ──────────────────────────────────────────────
    let mut result = LeadRunResult {
        job_id,
        topic: job.topic.clone(),
        records_total,
        extracted: 0,
        extraction_failures: 0,
        dropped_profiles: 0,
        leads: Vec::new(),
        errors: Vec::new(),
        duration_ms: 0,
    };

    let mut scored = Vec::new();
    for (record, outcome) in outcomes {
        match outcome {
            ExtractionResult::Success { draft, backend } => {
                result.extracted += 1;
                debug!(record_id = %record.id, backend = %backend, "Draft extracted");

                match normalize(draft, &record) {
                    Some(profile) => {
                        let score = score_profile(&profile, &job.topic, config, job.as_of);
                        scored.push(ScoredProfile { profile, score });
                    }
                    None => {
                        result.dropped_profiles += 1;
                    }
                }
            }
            ExtractionResult::Failure { reason, attempted } => {
                result.extraction_failures += 1;
                result.errors.push(format!(
                    "record {}: extraction failed ({reason:?}, attempted {})",
                    record.id,
                    attempted.join("→")
                ));
            }
        }
    }

    emit(
        "score",
        format!("{} profiles scored", scored.len()),
        result.extracted,
        result.extraction_failures,
    );

    // ── 4. Rank ───────────────────────────────────────────────────────────────
    result.leads = rank(scored);
    result.duration_ms = t0.elapsed().as_millis() as u64;

    emit(
        "done",
        format!("{} leads ranked", result.leads.len()),
        result.extracted,
        result.extraction_failures,
    );
    info!(
        job_id = %job_id,
        leads = result.leads.len(),
        failures = result.extraction_failures,
        dropped = result.dropped_profiles,
        duration_ms = result.duration_ms,
        "Lead pipeline finished"
    );

    result
}
