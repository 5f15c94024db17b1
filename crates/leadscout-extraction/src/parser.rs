//! Raw model output → ProfileDraft.
//!
//! Models wrap JSON in markdown fences or prose despite instructions, so the
//! parser slices out the outermost object before deserializing. A failure
//! here means the output lacks the required structural shape (not merely
//! empty optional fields) and counts as a failed extraction attempt.

use leadscout_common::ProfileDraft;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("malformed JSON object: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Parse a raw completion into a draft, tolerating fences and surrounding prose.
pub fn parse_draft(raw: &str) -> Result<ProfileDraft, ParseError> {
    let candidate = extract_json_object(raw).ok_or(ParseError::NoJsonObject)?;
    let draft: ProfileDraft = serde_json::from_str(candidate)?;
    Ok(draft)
}

/// Slice from the first `{` to the last `}`. Good enough for a single
/// top-level object, which is all the instruction asks for.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        let draft = parse_draft(r#"{"name": "Jane Doe", "keywords": ["liver"]}"#).unwrap();
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));
        assert_eq!(draft.keywords, vec!["liver"]);
    }

    #[test]
    fn test_fenced_object() {
        let raw = "```json\n{\"name\": \"Jane Doe\"}\n```";
        let draft = parse_draft(raw).unwrap();
        assert_eq!(draft.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_prose_around_object() {
        let raw = "Here is the extraction you asked for: {\"title\": \"Professor\"} Hope it helps!";
        let draft = parse_draft(raw).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Professor"));
    }

    #[test]
    fn test_missing_optional_fields_is_not_an_error() {
        let draft = parse_draft("{}").unwrap();
        assert!(draft.name.is_none());
        assert!(draft.keywords.is_empty());
    }

    #[test]
    fn test_no_object_is_parse_error() {
        assert!(matches!(parse_draft("I could not comply."), Err(ParseError::NoJsonObject)));
    }

    #[test]
    fn test_broken_json_is_parse_error() {
        assert!(matches!(
            parse_draft(r#"{"name": "Jane"#),
            Err(ParseError::NoJsonObject) | Err(ParseError::MalformedJson(_))
        ));
    }
}
