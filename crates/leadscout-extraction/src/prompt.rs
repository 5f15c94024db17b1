//! Fixed extraction instruction template.
//!
//! The same rendered prompt is sent to the primary and, on failure, the
//! fallback backend, so both attempts are comparable.

/// Schema the model is asked to fill. Optional fields may be null; the
/// structural shape (a single JSON object) is what the parser enforces.
const INSTRUCTION: &str = r#"You extract researcher lead information from scientific abstracts.

Read the abstract below and return ONLY a JSON object with exactly these keys:

{
  "name": "full name of the lead author or corresponding researcher, or null",
  "title": "their job title or academic role, or null",
  "affiliation": "institution or company, or null",
  "location": "city/region of the affiliation, or null",
  "email": "contact email if stated, or null",
  "keywords": ["research keywords mentioned in the abstract"],
  "summary": "one-sentence summary of the research, or null"
}

Rules:
- Return the JSON object only. No prose, no markdown fences.
- Use null for anything not stated in the text. Never invent values.
- Keywords should be short noun phrases taken from the abstract.

Abstract:
"#;

/// Render the full prompt for one abstract.
pub fn build_extraction_prompt(abstract_text: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTION.len() + abstract_text.len() + 1);
    prompt.push_str(INSTRUCTION);
    prompt.push_str(abstract_text.trim());
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_abstract() {
        let p = build_extraction_prompt("  We built 3D hepatic models.  ");
        assert!(p.contains("We built 3D hepatic models."));
        assert!(p.ends_with('\n'));
    }

    #[test]
    fn test_prompt_is_stable() {
        // Same input must render the same prompt (determinism of routing input).
        assert_eq!(
            build_extraction_prompt("abc"),
            build_extraction_prompt("abc")
        );
    }
}
