// Job posting structuring prompt.

use crate::extraction::template::render;
use crate::schemas::job;

pub const STRUCTURED_JOB_PROMPT: &str = r#"You are a JSON extraction engine. Convert the following raw job posting text into exactly the JSON schema below.
- Do not add any extra fields or prose.
- "jobTitle" is REQUIRED and must never be empty. If the posting states no explicit title, infer the most likely title from the responsibilities and requirements.
- Use "YYYY-MM-DD" for all dates, or null when no date is given.
- URLs (website, applyLink) must be absolute URIs.
- "employmentType" MUST be EXACTLY one of: "Full-time", "Part-time", "Contract", "Internship", "Temporary", "Not Specified".
- "remoteStatus" MUST be EXACTLY one of: "Fully Remote", "Hybrid", "On-site", "Not Specified".
- REQUIRED: populate "extractedKeywords" with every skill, technology, framework, tool, qualification and technical term found anywhere in the posting.
- Do not change the structure or key names. Output raw JSON only: no markdown, no code fences, no commentary.

Schema:
{schema}

Job Posting:
{job_text}

Output only one JSON object matching the EXACT schema above. "extractedKeywords" is MANDATORY and must be an array of strings."#;

pub fn build_prompt(job_text: &str) -> String {
    let schema = job::descriptor().render();
    render(
        STRUCTURED_JOB_PROMPT,
        &[("schema", &schema), ("job_text", job_text)],
    )
}
