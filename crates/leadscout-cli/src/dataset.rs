//! Static dataset loading.
//!
//! The dataset is a JSON object mapping topic tags to abstract entries:
//!
//! ```json
//! {
//!   "hepatic_toxicology": [
//!     { "text": "…", "pub_date": "2024-05-01", "email": "a@b.org" }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use leadscout_common::error::{LeadscoutError, Result};
use leadscout_common::AbstractRecord;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RawAbstract {
    #[serde(default)]
    id: Option<Uuid>,
    text: String,
    #[serde(default)]
    pub_date: Option<NaiveDate>,
    #[serde(default)]
    email: Option<String>,
}

/// Parse dataset JSON into records grouped by topic.
pub fn parse_dataset(json: &str) -> Result<HashMap<String, Vec<AbstractRecord>>> {
    let raw: HashMap<String, Vec<RawAbstract>> = serde_json::from_str(json)?;

    let mut dataset = HashMap::new();
    for (topic, entries) in raw {
        let records = entries
            .into_iter()
            .map(|entry| AbstractRecord {
                id: entry.id.unwrap_or_else(Uuid::new_v4),
                text: entry.text,
                topic: topic.clone(),
                pub_date: entry.pub_date,
                source_email: entry.email,
            })
            .collect();
        dataset.insert(topic, records);
    }
    Ok(dataset)
}

/// Load a dataset file from disk.
pub fn load_dataset(path: &Path) -> Result<HashMap<String, Vec<AbstractRecord>>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LeadscoutError::Dataset(format!("cannot read {}: {e}", path.display())))?;
    parse_dataset(&content)
}
