//! leadscout-llm — Extraction backend abstraction layer.
//! One capability contract (`ExtractionBackend::generate`) with variant
//! implementations per provider; routing lives in leadscout-extraction.

pub mod audit;
pub mod backend;
