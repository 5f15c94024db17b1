//! Scoring rule tables for lead ranking.
//!
//! The seniority, keyword, and location tables are immutable configuration
//! data passed explicitly into the scoring engine, so tests can substitute
//! alternate tables. Users can override the defaults via YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete scoring configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Topic tag → associated research keywords.
    #[serde(default = "default_topics")]
    pub topics: HashMap<String, Vec<String>>,

    /// Ordered seniority rules; the FIRST matching pattern wins.
    /// More specific patterns must precede their substrings
    /// (e.g. "associate professor" before "professor") — the order is
    /// part of the contract and keeps scores reproducible across runs.
    #[serde(default = "default_seniority")]
    pub seniority: Vec<SeniorityRule>,

    /// Ordered location bonus rules; the first matching pattern wins.
    #[serde(default = "default_location_bonus")]
    pub location_bonus: Vec<LocationRule>,

    #[serde(default)]
    pub recency: RecencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorityRule {
    /// Substring matched against the lower-cased title. Stored lower-cased;
    /// loaders normalize, so matching never re-cases the table.
    pub pattern: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRule {
    /// Substring matched against the lower-cased location. Stored lower-cased.
    pub pattern: String,
    pub bonus: f64,
}

/// Recency decay parameters.
///
/// Decay is LINEAR: full points up to `full_years` of age, zero from
/// `zero_years` onward, interpolated in between. Records without a
/// publication date receive `missing_date_points` — a documented
/// constant, never a random or absent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyConfig {
    #[serde(default = "default_recency_points")]
    pub full_points: f64,
    #[serde(default = "default_full_years")]
    pub full_years: f64,
    #[serde(default = "default_zero_years")]
    pub zero_years: f64,
    #[serde(default = "default_missing_date_points")]
    pub missing_date_points: f64,
}

fn default_recency_points() -> f64 { 40.0 }
fn default_full_years() -> f64 { 1.0 }
fn default_zero_years() -> f64 { 5.0 }
fn default_missing_date_points() -> f64 { 15.0 }

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            full_points: default_recency_points(),
            full_years: default_full_years(),
            zero_years: default_zero_years(),
            missing_date_points: default_missing_date_points(),
        }
    }
}

// ── Default tables ────────────────────────────────────────────────────────────

fn default_topics() -> HashMap<String, Vec<String>> {
    let mut topics = HashMap::new();
    topics.insert(
        "hepatic_toxicology".to_string(),
        vec!["liver", "toxicity", "3d models", "hepatic"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    topics.insert(
        "oncology".to_string(),
        vec!["tumor", "oncology", "immunotherapy", "biomarker"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    topics.insert(
        "neurodegeneration".to_string(),
        vec!["neurodegeneration", "alzheimer", "organoid"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    topics
}

fn default_seniority() -> Vec<SeniorityRule> {
    // "associate professor" / "assistant professor" must stay above the
    // bare "professor" entry: first match wins.
    let rules: &[(&str, f64)] = &[
        ("associate professor", 20.0),
        ("assistant professor", 20.0),
        ("professor", 30.0),
        ("principal investigator", 30.0),
        ("director", 30.0),
        ("head of", 30.0),
        ("chief", 30.0),
        ("senior scientist", 20.0),
        ("group leader", 20.0),
        ("staff scientist", 20.0),
        ("lead scientist", 20.0),
        ("postdoc", 10.0),
        ("research associate", 10.0),
        ("research fellow", 10.0),
        ("graduate student", 10.0),
    ];
    rules
        .iter()
        .map(|(pattern, points)| SeniorityRule {
            pattern: pattern.to_string(),
            points: *points,
        })
        .collect()
}

fn default_location_bonus() -> Vec<LocationRule> {
    let rules: &[(&str, f64)] = &[
        ("boston", 10.0),
        ("cambridge", 10.0),
        ("bay area", 10.0),
        ("san francisco", 10.0),
        ("palo alto", 10.0),
        ("berkeley", 10.0),
        ("basel", 10.0),
        ("san diego", 5.0),
        ("oxford", 5.0),
        ("zurich", 5.0),
    ];
    rules
        .iter()
        .map(|(pattern, bonus)| LocationRule {
            pattern: pattern.to_string(),
            bonus: *bonus,
        })
        .collect()
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            seniority: default_seniority(),
            location_bonus: default_location_bonus(),
            recency: RecencyConfig::default(),
        }
    }
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl TopicConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config.lowercased())
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config.lowercased())
    }

    /// Lower-case all rule patterns once so matching against lower-cased
    /// fields needs no per-row re-casing.
    fn lowercased(mut self) -> Self {
        for rule in &mut self.seniority {
            rule.pattern = rule.pattern.to_lowercase();
        }
        for rule in &mut self.location_bonus {
            rule.pattern = rule.pattern.to_lowercase();
        }
        self
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Keywords associated with a topic tag, if the topic is known.
    pub fn keywords_for(&self, topic: &str) -> Option<&[String]> {
        self.topics.get(topic).map(|v| v.as_slice())
    }

    /// Check that every rule stays within its sub-score cap and the
    /// recency curve is monotonic.
    pub fn validate(&self) -> bool {
        self.seniority.iter().all(|r| (0.0..=30.0).contains(&r.points))
            && self.location_bonus.iter().all(|r| (0.0..=10.0).contains(&r.bonus))
            && self.recency.full_points <= 40.0
            && self.recency.missing_date_points <= self.recency.full_points
            && self.recency.full_years < self.recency.zero_years
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
