//! Leadscout — ranked researcher leads from scientific abstracts.
//! Entry point for the CLI binary.

mod config;
mod dataset;
mod export;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use leadscout_common::TopicConfig;
use leadscout_extraction::ExtractionRouter;
use leadscout_llm::backend::{ExtractionBackend, GeminiBackend, OpenAiBackend};
use leadscout_pipeline::{run_lead_pipeline, LeadJob};
use leadscout_ranker::{filter_leads, LeadFilter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "leadscout", about = "Extract and rank researcher leads from abstracts")]
struct Cli {
    /// Dataset file (JSON, topic → abstracts)
    #[arg(long, default_value = "data/sample_abstracts.json")]
    dataset: PathBuf,

    /// Topic tag to process (must exist in the dataset and rule tables)
    #[arg(long)]
    topic: String,

    /// Scoring reference date (YYYY-MM-DD); defaults to today.
    /// Pin this for reproducible runs.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Keep only leads whose name contains this substring
    #[arg(long)]
    name_filter: Option<String>,

    /// Keep only leads whose location contains this substring
    #[arg(long)]
    location_filter: Option<String>,

    /// Keep only leads scoring at least this total
    #[arg(long)]
    min_score: Option<f64>,

    /// Write ranked leads to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Write ranked leads to this JSON file
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Config file path (default: ./leadscout.toml or $LEADSCOUT_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Build the primary/fallback router from config. The configured primary is
/// tried first; the other provider with a usable key becomes the fallback.
fn build_router(cfg: &config::Config) -> anyhow::Result<ExtractionRouter> {
    let mut backends: Vec<Arc<dyn ExtractionBackend>> = Vec::new();

    let openai = cfg.llm.openai.as_ref().and_then(|provider| {
        config::resolve_api_key(&provider.api_key, &["LEADSCOUT_OPENAI_API_KEY", "OPENAI_API_KEY"])
            .map(|key| Arc::new(OpenAiBackend::new(key, &provider.model)) as Arc<dyn ExtractionBackend>)
    });
    if openai.is_none() && cfg.llm.openai.is_some() {
        tracing::warn!("OpenAI configured but no API key found (set llm.openai.api_key or OPENAI_API_KEY)");
    }

    let gemini = cfg.llm.gemini.as_ref().and_then(|provider| {
        config::resolve_api_key(&provider.api_key, &["LEADSCOUT_GEMINI_API_KEY", "GOOGLE_API_KEY"])
            .map(|key| Arc::new(GeminiBackend::new(key, &provider.model)) as Arc<dyn ExtractionBackend>)
    });
    if gemini.is_none() && cfg.llm.gemini.is_some() {
        tracing::warn!("Gemini configured but no API key found (set llm.gemini.api_key or GOOGLE_API_KEY)");
    }

    match cfg.llm.primary.as_str() {
        "gemini" => backends.extend([gemini, openai].into_iter().flatten()),
        _ => backends.extend([openai, gemini].into_iter().flatten()),
    }

    let mut backends = backends.into_iter();
    let Some(primary) = backends.next() else {
        anyhow::bail!(
            "No extraction backends available. Configure at least one provider \
             in leadscout.toml and set its API key (OPENAI_API_KEY or GOOGLE_API_KEY)."
        );
    };
    let fallback = backends.next();

    info!(
        primary = primary.name(),
        fallback = fallback.as_deref().map(|b| b.name()),
        "Extraction router ready"
    );
    Ok(ExtractionRouter::new(primary, fallback)
        .with_timeout(Duration::from_secs(cfg.llm.timeout_secs)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leadscout=debug,info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref())?;
    let tables = match &config.scoring.tables {
        Some(path) => TopicConfig::from_yaml(path)?,
        None => TopicConfig::default(),
    };
    if !tables.validate() {
        anyhow::bail!("scoring tables violate sub-score caps; fix the tables file");
    }

    let mut dataset = dataset::load_dataset(&cli.dataset)?;
    let Some(records) = dataset.remove(&cli.topic) else {
        let mut topics: Vec<&String> = dataset.keys().collect();
        topics.sort();
        anyhow::bail!("topic {:?} not in dataset (available: {topics:?})", cli.topic);
    };
    info!(topic = %cli.topic, records = records.len(), "Dataset loaded");

    let router = Arc::new(build_router(&config)?);
    let as_of = cli.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let job = LeadJob::new(&cli.topic, as_of).with_concurrency(config.pipeline.concurrency);

    let result = run_lead_pipeline(records, router, &tables, job, None).await;

    for error in &result.errors {
        tracing::warn!("{error}");
    }

    let filter = LeadFilter {
        name_pattern: cli.name_filter,
        location_pattern: cli.location_filter,
        min_score: cli.min_score,
    };
    let leads = filter_leads(&result.leads, &filter);

    if leads.is_empty() {
        // Empty-result state, not a failure.
        println!(
            "No leads ({} records, {} extracted, {} failed, {} dropped).",
            result.records_total, result.extracted, result.extraction_failures, result.dropped_profiles
        );
        return Ok(());
    }

    println!(
        "{:<4} {:<6} {:<26} {:<30} {:<20}",
        "#", "score", "name", "title", "location"
    );
    for (i, lead) in leads.iter().enumerate() {
        println!(
            "{:<4} {:<6.1} {:<26} {:<30} {:<20}",
            i + 1,
            lead.score.total,
            lead.profile.name,
            lead.profile.title,
            lead.profile.location
        );
    }
    println!(
        "\n{} leads from {} records in {} ms ({} extraction failures, {} dropped)",
        leads.len(),
        result.records_total,
        result.duration_ms,
        result.extraction_failures,
        result.dropped_profiles
    );

    if let Some(ref path) = cli.csv_out {
        export::write_csv(path, &leads)?;
        info!(path = %path.display(), "CSV export written");
    }
    if let Some(ref path) = cli.json_out {
        export::write_json(path, &leads)?;
        info!(path = %path.display(), "JSON export written");
    }

    Ok(())
}
