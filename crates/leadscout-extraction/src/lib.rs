//! leadscout-extraction — Free text → validated researcher profile.
//!
//! Stages: prompt rendering, backend routing with a single fallback step,
//! raw-output parsing into a ProfileDraft, and normalization into a Profile.

pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod router;

pub use normalize::normalize;
pub use router::{ExtractionResult, ExtractionRouter, FailureReason};
