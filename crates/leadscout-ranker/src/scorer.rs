//! Four-criterion lead score computation.
//!
//! `score_profile` is a pure function: the same profile, topic, config, and
//! as-of date always produce the same ScoreBreakdown. All rule tables come
//! in through `TopicConfig`; nothing here reads global state. Scoring never
//! fails for a profile that passed normalization — every missing input
//! contributes its documented zero/neutral default.

use chrono::NaiveDate;
use leadscout_common::{LocationRule, Profile, RecencyConfig, ScoreBreakdown, SeniorityRule, TopicConfig};

/// Compute the full breakdown for one profile.
pub fn score_profile(
    profile: &Profile,
    topic: &str,
    config: &TopicConfig,
    as_of: NaiveDate,
) -> ScoreBreakdown {
    let topic_keywords = config.keywords_for(topic).unwrap_or(&[]);

    ScoreBreakdown::from_components(
        role_seniority(&profile.title, &config.seniority),
        recency(profile.pub_date, as_of, &config.recency),
        keyword_relevance(&profile.keywords, topic_keywords),
        location_fit(&profile.location, &config.location_bonus),
    )
}

/// Seniority tier of the title, 0–30.
/// First matching rule wins; the table order is the tie-break.
/// Rule patterns are stored lower-cased, so only the title is re-cased here.
pub fn role_seniority(title: &str, rules: &[SeniorityRule]) -> f64 {
    let title = title.to_lowercase();
    rules
        .iter()
        .find(|rule| title.contains(&rule.pattern))
        .map(|rule| rule.points)
        .unwrap_or(0.0)
}

/// Publication recency, 0–40, linear decay.
///
/// Age ≤ `full_years` → `full_points`; age ≥ `zero_years` → 0; linear in
/// between. No date → the documented `missing_date_points` constant.
pub fn recency(pub_date: Option<NaiveDate>, as_of: NaiveDate, cfg: &RecencyConfig) -> f64 {
    let Some(date) = pub_date else {
        return cfg.missing_date_points;
    };

    let age_days = (as_of - date).num_days();
    if age_days < 0 {
        // Dated in the future (preprint embargo quirks); treat as brand new.
        return cfg.full_points;
    }

    let age_years = age_days as f64 / 365.25;
    if age_years <= cfg.full_years {
        cfg.full_points
    } else if age_years >= cfg.zero_years {
        0.0
    } else {
        cfg.full_points * (cfg.zero_years - age_years) / (cfg.zero_years - cfg.full_years)
    }
}

/// Topic keyword overlap, 0–20, proportional to the fraction of topic
/// keywords found in the profile's normalized keywords.
pub fn keyword_relevance(profile_keywords: &[String], topic_keywords: &[String]) -> f64 {
    if profile_keywords.is_empty() || topic_keywords.is_empty() {
        return 0.0;
    }

    let matched = topic_keywords
        .iter()
        .filter(|topic_kw| {
            let topic_kw = topic_kw.to_lowercase();
            profile_keywords.iter().any(|kw| kw.contains(&topic_kw))
        })
        .count();

    (20.0 * matched as f64 / topic_keywords.len() as f64).min(20.0)
}

/// Location bonus, 0–10. First matching rule wins; unmatched is 0, never negative.
pub fn location_fit(location: &str, rules: &[LocationRule]) -> f64 {
    let location = location.to_lowercase();
    rules
        .iter()
        .find(|rule| location.contains(&rule.pattern))
        .map(|rule| rule.bonus)
        .unwrap_or(0.0)
}
