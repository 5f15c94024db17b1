//! leadscout-pipeline — End-to-end lead generation orchestrator.

pub mod pipeline;

pub use pipeline::{run_lead_pipeline, LeadJob, LeadProgress, LeadRunResult};
