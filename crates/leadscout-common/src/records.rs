//! Core record types following the lead lifecycle:
//! AbstractRecord → ProfileDraft → Profile → Profile + ScoreBreakdown.
//! Every transition produces a new value; nothing is mutated in place.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Sentinel for fields the extraction left blank. Scoring matches against
/// this stable default instead of the empty string.
pub const UNSPECIFIED: &str = "unspecified";

// ---------------------------------------------------------------------------
// Abstract Record
// ---------------------------------------------------------------------------

/// One unit of input: a scientific abstract plus source metadata.
/// Created by the data source, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractRecord {
    pub id: Uuid,
    /// Raw abstract body handed to the extraction backend.
    pub text: String,
    /// Research topic tag this record was retrieved under.
    pub topic: String,
    pub pub_date: Option<NaiveDate>,
    /// Email pre-supplied by the source in structured fields, if any.
    pub source_email: Option<String>,
}

impl AbstractRecord {
    pub fn new(text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            topic: topic.into(),
            pub_date: None,
            source_email: None,
        }
    }

    pub fn with_pub_date(mut self, date: NaiveDate) -> Self {
        self.pub_date = Some(date);
        self
    }

    pub fn with_source_email(mut self, email: impl Into<String>) -> Self {
        self.source_email = Some(email.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Profile Draft
// ---------------------------------------------------------------------------

/// Raw extraction output as returned by a backend, before validation.
/// Any field may be missing or malformed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Models sometimes return a bare string instead of an array.
    #[serde(default, deserialize_with = "string_or_seq")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => vec![],
    })
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Canonical post-normalization researcher record.
///
/// Invariants: `name` is non-empty, `keywords` are lower-cased and deduped
/// (first-seen order), `email` is either plausibly shaped or absent, and the
/// optional text fields hold [`UNSPECIFIED`] instead of the empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Back-reference to the originating AbstractRecord (lookup only).
    pub source_record_id: Uuid,
    pub name: String,
    pub title: String,
    pub affiliation: String,
    pub location: String,
    pub email: Option<String>,
    pub keywords: Vec<String>,
    pub summary: String,
    /// Carried over from the record for recency scoring.
    pub pub_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Score Breakdown
// ---------------------------------------------------------------------------

/// Four-criterion decomposition of a lead-quality score.
/// Immutable once computed; rescoring produces a new breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Title seniority tier, 0–30.
    pub role_seniority: f64,
    /// Publication recency, 0–40.
    pub recency: f64,
    /// Topic keyword overlap, 0–20.
    pub keyword_relevance: f64,
    /// Institution/region bonus, 0–10.
    pub location_fit: f64,
    /// Exact sum of the four components, clamped to [0, 100].
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn from_components(
        role_seniority: f64,
        recency: f64,
        keyword_relevance: f64,
        location_fit: f64,
    ) -> Self {
        let total = (role_seniority + recency + keyword_relevance + location_fit)
            .clamp(0.0, 100.0);
        Self {
            role_seniority,
            recency,
            keyword_relevance,
            location_fit,
            total,
        }
    }
}
