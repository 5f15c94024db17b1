//! leadscout-common — Shared types, errors, and rule tables used across all Leadscout crates.

pub mod error;
pub mod records;
pub mod topic_config;

// Re-export commonly used types
pub use records::{AbstractRecord, Profile, ProfileDraft, ScoreBreakdown, UNSPECIFIED};
pub use topic_config::{LocationRule, RecencyConfig, SeniorityRule, TopicConfig};
