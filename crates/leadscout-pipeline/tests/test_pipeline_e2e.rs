//! End-to-end pipeline test with scripted fake backends.
//!
//! No network: backends answer from a canned map keyed on markers in the
//! abstract text, with per-record latency so extractions finish out of order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use leadscout_common::{AbstractRecord, TopicConfig};
use leadscout_extraction::ExtractionRouter;
use leadscout_llm::backend::{ExtractionBackend, LlmError};
use leadscout_pipeline::{run_lead_pipeline, LeadJob};

/// Answers with the canned draft whose marker appears in the prompt, after
/// the configured delay. Unknown prompts are a scripted failure.
struct CannedBackend {
    name: &'static str,
    responses: HashMap<&'static str, (&'static str, u64)>,
}

#[async_trait]
impl ExtractionBackend for CannedBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        for (marker, (json, delay_ms)) in &self.responses {
            if prompt.contains(marker) {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                return Ok(json.to_string());
            }
        }
        Err(LlmError::Unavailable("no canned response".to_string()))
    }

    fn name(&self) -> &str {
        self.name
    }

    fn model_id(&self) -> &str {
        "canned-model"
    }
}

fn canned_router() -> Arc<ExtractionRouter> {
    let mut responses = HashMap::new();
    // Latencies are deliberately inverted relative to the expected ranking.
    responses.insert(
        "MARKER_A",
        (
            r#"{"name": "Prof. Ada Hepworth", "title": "Professor of Toxicology",
                "affiliation": "Broad Institute", "location": "Cambridge, MA",
                "keywords": ["liver", "toxicity", "3d models"],
                "summary": "Organ-on-chip toxicity screening."}"#,
            80u64,
        ),
    );
    responses.insert(
        "MARKER_B",
        (
            r#"{"name": "Ben Liao", "title": "Postdoctoral Researcher",
                "location": "Reykjavik", "keywords": ["liver"]}"#,
            5u64,
        ),
    );
    responses.insert(
        "MARKER_C",
        (
            // No name: normalization must drop this one.
            r#"{"title": "Senior Scientist", "keywords": ["toxicity"]}"#,
            40u64,
        ),
    );

    let primary = Arc::new(CannedBackend {
        name: "openai",
        responses,
    });
    Arc::new(ExtractionRouter::new(primary, None))
}

fn records() -> Vec<AbstractRecord> {
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    vec![
        AbstractRecord::new("MARKER_A hepatic spheroid toxicity study", "hepatic_toxicology")
            .with_pub_date(date),
        AbstractRecord::new("MARKER_B liver perfusion model", "hepatic_toxicology")
            .with_pub_date(date),
        AbstractRecord::new("MARKER_C unrelated screening note", "hepatic_toxicology"),
        // No canned response → extraction failure, must not appear in output.
        AbstractRecord::new("MARKER_X unknown record", "hepatic_toxicology"),
    ]
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_counts_and_ranking() {
    let config = TopicConfig::default();
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let job = LeadJob::new("hepatic_toxicology", as_of).with_concurrency(4);

    let result = run_lead_pipeline(records(), canned_router(), &config, job, None).await;

    assert_eq!(result.records_total, 4);
    assert_eq!(result.extracted, 3);
    assert_eq!(result.extraction_failures, 1);
    assert_eq!(result.dropped_profiles, 1);
    assert_eq!(result.leads.len(), 2);

    // The professor in Cambridge with full keyword overlap outranks the
    // postdoc despite finishing extraction last.
    assert_eq!(result.leads[0].profile.name, "Prof. Ada Hepworth");
    assert_eq!(result.leads[1].profile.name, "Ben Liao");
    assert!(result.leads[0].score.total > result.leads[1].score.total);
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ranking_independent_of_completion_order() {
    let config = TopicConfig::default();
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    // Serial run: completions arrive in submission order.
    let serial_job = LeadJob::new("hepatic_toxicology", as_of).with_concurrency(1);
    let serial = run_lead_pipeline(records(), canned_router(), &config, serial_job, None).await;

    // Concurrent run: canned latencies shuffle the completion order.
    let concurrent_job = LeadJob::new("hepatic_toxicology", as_of).with_concurrency(4);
    let concurrent =
        run_lead_pipeline(records(), canned_router(), &config, concurrent_job, None).await;

    let serial_names: Vec<&str> = serial.leads.iter().map(|l| l.profile.name.as_str()).collect();
    let concurrent_names: Vec<&str> =
        concurrent.leads.iter().map(|l| l.profile.name.as_str()).collect();
    assert_eq!(serial_names, concurrent_names);

    for (a, b) in serial.leads.iter().zip(concurrent.leads.iter()) {
        assert_eq!(a.score, b.score);
    }
}

#[tokio::test]
async fn test_empty_input_is_empty_result_not_error() {
    let config = TopicConfig::default();
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let job = LeadJob::new("hepatic_toxicology", as_of);

    let result = run_lead_pipeline(vec![], canned_router(), &config, job, None).await;
    assert_eq!(result.records_total, 0);
    assert!(result.leads.is_empty());
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_progress_events_reach_done_stage() {
    let config = TopicConfig::default();
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let job = LeadJob::new("hepatic_toxicology", as_of);

    let (tx, mut rx) = tokio::sync::broadcast::channel(16);
    let result = run_lead_pipeline(records(), canned_router(), &config, job, Some(tx)).await;

    let mut stages = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.job_id, result.job_id);
        stages.push(event.stage);
    }
    assert_eq!(stages, vec!["extract", "score", "done"]);
}
