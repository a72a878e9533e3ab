// Résumé structuring prompt. `{schema}` and `{resume_text}` are substituted
// by `build_prompt`.

use crate::extraction::template::render;
use crate::schemas::resume;

pub const STRUCTURED_RESUME_PROMPT: &str = r#"You are a JSON extraction engine. Convert the following resume text into precisely the JSON schema specified below.
- Map each resume section to the schema without inventing information.
- If a field is missing in the source text, use null, an empty string or an empty list as appropriate.
- Preserve bullet points in the "description" arrays as short factual sentences.
- Use "Present" if an end date is ongoing and prefer YYYY-MM-DD where dates are available.
- REQUIRED: populate "extractedKeywords" with every skill, technology, framework, tool and technical term found anywhere in the resume.
- Do not add extra fields or commentary. Output raw JSON only: no markdown, no code fences, no prose.

Schema:
{schema}

Resume:
{resume_text}

Output only one JSON object matching the EXACT schema above. "extractedKeywords" is MANDATORY and must be an array of strings."#;

pub fn build_prompt(resume_text: &str) -> String {
    let schema = resume::descriptor().render();
    render(
        STRUCTURED_RESUME_PROMPT,
        &[("schema", &schema), ("resume_text", resume_text)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_schema_and_text() {
        let prompt = build_prompt("Jane Doe, Rust engineer");
        assert!(prompt.contains("Jane Doe, Rust engineer"));
        assert!(prompt.contains("\"extractedKeywords\""));
        assert!(prompt.contains("\"personalData\""));
        assert!(!prompt.contains("{schema}"));
        assert!(!prompt.contains("{resume_text}"));
    }
}
