//! leadscout-ranker — Lead scoring and ranking engine.
//! Pure functions over normalized profiles; no I/O, no shared state.

pub mod rank;
pub mod scorer;

pub use rank::{filter_leads, rank, LeadFilter, ScoredProfile};
pub use scorer::score_profile;
