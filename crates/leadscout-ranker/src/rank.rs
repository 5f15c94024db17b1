//! Deterministic ranking and post-hoc filtering of scored leads.

use leadscout_common::{Profile, ScoreBreakdown};
use serde::{Deserialize, Serialize};

/// Output pair handed to presentation/export collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProfile {
    pub profile: Profile,
    pub score: ScoreBreakdown,
}

/// Sort by total score descending. Ties break by recency sub-score
/// descending, then name ascending, so identical inputs always produce
/// identical orderings (f64::total_cmp gives a total order).
pub fn rank(mut leads: Vec<ScoredProfile>) -> Vec<ScoredProfile> {
    leads.sort_by(|a, b| {
        b.score
            .total
            .total_cmp(&a.score.total)
            .then_with(|| b.score.recency.total_cmp(&a.score.recency))
            .then_with(|| a.profile.name.cmp(&b.profile.name))
    });
    leads
}

/// Post-hoc filters over a ranked list. All present criteria must hold
/// (AND semantics); filtering never reorders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadFilter {
    /// Case-insensitive substring of the profile name.
    pub name_pattern: Option<String>,
    /// Case-insensitive substring of the profile location.
    pub location_pattern: Option<String>,
    /// Inclusive lower bound on the total score.
    pub min_score: Option<f64>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &ScoredProfile) -> bool {
        if let Some(ref pattern) = self.name_pattern {
            if !contains_ci(&lead.profile.name, pattern) {
                return false;
            }
        }
        if let Some(ref pattern) = self.location_pattern {
            if !contains_ci(&lead.profile.location, pattern) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if lead.score.total < min {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Apply a filter to an already-ranked list, preserving order.
pub fn filter_leads(leads: &[ScoredProfile], filter: &LeadFilter) -> Vec<ScoredProfile> {
    leads.iter().filter(|l| filter.matches(l)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscout_common::UNSPECIFIED;
    use uuid::Uuid;

    fn lead(name: &str, location: &str, total_parts: (f64, f64)) -> ScoredProfile {
        let (role, recency) = total_parts;
        ScoredProfile {
            profile: Profile {
                source_record_id: Uuid::new_v4(),
                name: name.to_string(),
                title: UNSPECIFIED.to_string(),
                affiliation: UNSPECIFIED.to_string(),
                location: location.to_string(),
                email: None,
                keywords: vec![],
                summary: UNSPECIFIED.to_string(),
                pub_date: None,
            },
            score: ScoreBreakdown::from_components(role, recency, 0.0, 0.0),
        }
    }

    #[test]
    fn test_rank_descending_by_total() {
        let ranked = rank(vec![
            lead("Low", "x", (10.0, 0.0)),
            lead("High", "x", (30.0, 40.0)),
            lead("Mid", "x", (20.0, 10.0)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|l| l.profile.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].score.total >= pair[1].score.total);
        }
    }

    #[test]
    fn test_tie_breaks_recency_then_name() {
        // Equal totals: 30+10 vs 10+30 vs 10+30.
        let ranked = rank(vec![
            lead("Zed", "x", (10.0, 30.0)),
            lead("Amy", "x", (30.0, 10.0)),
            lead("Bob", "x", (10.0, 30.0)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|l| l.profile.name.as_str()).collect();
        // Higher recency first; equal recency resolves alphabetically.
        assert_eq!(names, vec!["Bob", "Zed", "Amy"]);
    }

    #[test]
    fn test_rank_is_stable_across_runs() {
        let input = vec![
            lead("B", "x", (20.0, 20.0)),
            lead("A", "x", (20.0, 20.0)),
            lead("C", "x", (30.0, 0.0)),
        ];
        let first: Vec<String> = rank(input.clone())
            .into_iter()
            .map(|l| l.profile.name)
            .collect();
        let second: Vec<String> = rank(input)
            .into_iter()
            .map(|l| l.profile.name)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_is_order_preserving_subset() {
        let ranked = rank(vec![
            lead("Jane Doe", "Boston", (30.0, 40.0)),
            lead("John Roe", "Basel", (20.0, 10.0)),
            lead("Janet Poe", "Boston", (10.0, 0.0)),
        ]);
        let filter = LeadFilter {
            location_pattern: Some("boston".to_string()),
            ..Default::default()
        };
        let filtered = filter_leads(&ranked, &filter);
        let names: Vec<&str> = filtered.iter().map(|l| l.profile.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Janet Poe"]);
    }

    #[test]
    fn test_filters_compose_with_and_semantics() {
        let ranked = rank(vec![
            lead("Jane Doe", "Boston", (30.0, 40.0)),
            lead("Jane Smith", "Basel", (30.0, 40.0)),
            lead("Jane Low", "Boston", (5.0, 0.0)),
        ]);
        let filter = LeadFilter {
            name_pattern: Some("jane".to_string()),
            location_pattern: Some("boston".to_string()),
            min_score: Some(50.0),
        };
        let filtered = filter_leads(&ranked, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].profile.name, "Jane Doe");
    }

    #[test]
    fn test_min_score_is_inclusive() {
        let leads = vec![lead("Edge", "x", (30.0, 40.0))];
        let filter = LeadFilter {
            min_score: Some(70.0),
            ..Default::default()
        };
        assert_eq!(filter_leads(&leads, &filter).len(), 1);
    }
}
