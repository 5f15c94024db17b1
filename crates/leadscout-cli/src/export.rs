//! Ranked-lead export writers (CSV and JSON).
//! The core hands over a fully ranked sequence; these only format and write.

use std::path::Path;

use leadscout_common::error::Result;
use leadscout_ranker::ScoredProfile;

/// Write leads to CSV, one row per lead, rank included.
pub fn write_csv(path: &Path, leads: &[ScoredProfile]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", path.display()))?;

    writer
        .write_record([
            "rank",
            "name",
            "title",
            "affiliation",
            "location",
            "email",
            "keywords",
            "total",
            "role_seniority",
            "recency",
            "keyword_relevance",
            "location_fit",
            "summary",
        ])
        .map_err(|e| anyhow::anyhow!("csv write failed: {e}"))?;

    for (i, lead) in leads.iter().enumerate() {
        writer
            .write_record([
                (i + 1).to_string(),
                lead.profile.name.clone(),
                lead.profile.title.clone(),
                lead.profile.affiliation.clone(),
                lead.profile.location.clone(),
                lead.profile.email.clone().unwrap_or_default(),
                lead.profile.keywords.join("; "),
                format!("{:.1}", lead.score.total),
                format!("{:.1}", lead.score.role_seniority),
                format!("{:.1}", lead.score.recency),
                format!("{:.1}", lead.score.keyword_relevance),
                format!("{:.1}", lead.score.location_fit),
                lead.profile.summary.clone(),
            ])
            .map_err(|e| anyhow::anyhow!("csv write failed: {e}"))?;
    }

    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))?;
    Ok(())
}

/// Write leads as pretty-printed JSON.
pub fn write_json(path: &Path, leads: &[ScoredProfile]) -> Result<()> {
    let json = serde_json::to_string_pretty(leads)?;
    std::fs::write(path, json).map_err(|e| anyhow::anyhow!("cannot write {}: {e}", path.display()))?;
    Ok(())
}
