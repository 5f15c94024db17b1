//! Draft validation and cleanup before scoring.

use leadscout_common::{AbstractRecord, Profile, ProfileDraft, UNSPECIFIED};
use regex::Regex;
use tracing::debug;

/// Minimal plausibility shape: local-part `@` domain-with-dot.
fn email_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validate and clean a draft into a canonical Profile.
///
/// Returns None when the draft has no usable name — the record is dropped
/// from the pipeline (logged, not surfaced as a run failure).
pub fn normalize(draft: ProfileDraft, record: &AbstractRecord) -> Option<Profile> {
    let name = draft.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        debug!(record_id = %record.id, "Draft has no name after trim, dropping record");
        return None;
    }

    // First plausibly-shaped candidate wins: an invalid draft email (models
    // hallucinate these) must not mask a valid structured source_email.
    let email = [draft.email.as_deref(), record.source_email.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|e| email_regex().is_match(e))
        .map(String::from);

    Some(Profile {
        source_record_id: record.id,
        name: name.to_string(),
        title: clean_field(draft.title),
        affiliation: clean_field(draft.affiliation),
        location: clean_field(draft.location),
        email,
        keywords: normalize_keywords(draft.keywords),
        summary: clean_field(draft.summary),
        pub_date: record.pub_date,
    })
}

/// Trim; empty becomes the "unspecified" sentinel so downstream scoring has
/// a stable default to match against.
fn clean_field(value: Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

/// Lower-case and dedup, preserving first-seen order. An empty result stays
/// empty: scoring treats it as zero relevance, not an error.
fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for kw in keywords {
        let kw = kw.trim().to_lowercase();
        if !kw.is_empty() && !out.contains(&kw) {
            out.push(kw);
        }
    }
    out
}
