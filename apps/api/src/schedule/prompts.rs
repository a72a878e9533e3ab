// Learning schedule prompt.

use crate::extraction::template::render;
use crate::schedule::service::{keyword_bullets, ScheduleContext};
use crate::schemas::{schedule, ScheduleType};

pub const LEARNING_SCHEDULE_PROMPT: &str = r#"You are an expert career coach and learning strategist. Generate a complete learning schedule JSON object.

CRITICAL: respond with ONE JSON object with exactly these top-level fields:
scheduleType, totalDurationWeeks, overview, schedule, recommendations, progressTracking.
Do NOT return a bare array. Do NOT wrap the object in another key.

STRICT VALIDATION RULES:
1. activityType MUST be EXACTLY one of: "Course", "Tutorial", "Practice Project", "Reading", "Certification", "Hands-on Practice"
2. priority MUST be EXACTLY one of: "High", "Medium", "Low"
3. resources[].type MUST be EXACTLY one of: "Platform", "Documentation", "Book", "Video", "Article"
4. complexity MUST be EXACTLY one of: "Beginner", "Intermediate", "Advanced"
5. scheduleType MUST be EXACTLY: "{schedule_type}"
6. totalDurationWeeks MUST be {duration_weeks}
7. Field names are case-sensitive and must match the schema exactly.

Schema:
{schema}

Instructions:
1. Compare the candidate's current skills with the job requirements. List missing skills in skillsToLearn and existing but weak skills in skillsToImprove, most important first.
2. Build a {schedule_type} schedule covering {duration_weeks} weeks. Label each period "{period_label} 1", "{period_label} 2" and so on. Monthly schedules group roughly four weeks per month.
3. Give every period a focus, measurable learning goals, 3-5 concrete activities with estimatedHours of at least 1, and milestones. Aim for 10-20 hours of learning per week.
4. Recommend relevant certifications (estimatedTimeMonths of at least 1), 2-3 portfolio projects and networking strategies.
5. Define weekly checkpoints and success metrics.
6. Use real, accessible resources and keep every critical array non-empty.

Output raw JSON only: no markdown, no code fences, no commentary.

Processed Resume Data:
{resume_json}

Processed Job Data:
{job_json}

Resume Keywords:
{resume_keywords}

Job Keywords:
{job_keywords}

Schedule Type: {schedule_type}
Duration: {duration_weeks} weeks

Now generate the personalized learning schedule as a single JSON object."#;

pub fn build_prompt(
    context: &ScheduleContext,
    schedule_type: ScheduleType,
    duration_weeks: u32,
) -> String {
    let pretty = |value: &serde_json::Value| {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    };

    let duration = duration_weeks.to_string();
    let schema = schedule::descriptor().render();
    let resume_keywords = keyword_bullets(&context.resume_keywords);
    let job_keywords = keyword_bullets(&context.job_keywords);
    let resume_json = pretty(&context.resume);
    let job_json = pretty(&context.job);

    render(
        LEARNING_SCHEDULE_PROMPT,
        &[
            ("schedule_type", schedule_type.as_str()),
            ("period_label", schedule_type.period_label()),
            ("duration_weeks", &duration),
            ("schema", &schema),
            ("resume_keywords", &resume_keywords),
            ("job_keywords", &job_keywords),
            ("resume_json", &resume_json),
            ("job_json", &job_json),
        ],
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context() -> ScheduleContext {
        ScheduleContext {
            resume: json!({ "skills": [{ "skillName": "SQL" }] }),
            job: json!({ "jobTitle": "Frontend Engineer" }),
            resume_keywords: vec!["SQL".to_string()],
            job_keywords: vec!["React".to_string(), "TypeScript".to_string()],
        }
    }

    #[test]
    fn test_all_placeholders_are_filled() {
        let prompt = build_prompt(&context(), ScheduleType::Monthly, 12);
        for placeholder in [
            "{schema}",
            "{resume_json}",
            "{job_json}",
            "{resume_keywords}",
            "{job_keywords}",
            "{schedule_type}",
            "{period_label}",
            "{duration_weeks}",
        ] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
        assert!(prompt.contains("scheduleType MUST be EXACTLY: \"monthly\""));
        assert!(prompt.contains("\"Month 1\""));
        assert!(prompt.contains("Duration: 12 weeks"));
    }

    #[test]
    fn test_keywords_render_as_bullets() {
        let prompt = build_prompt(&context(), ScheduleType::Weekly, 8);
        assert!(prompt.contains("- React\n- TypeScript"));
        assert!(prompt.contains("Frontend Engineer"));
    }

    #[test]
    fn test_placeholder_text_inside_resume_is_kept_verbatim() {
        let mut ctx = context();
        ctx.resume = json!({ "summary": "Templating with {job_json} and {schema}" });
        let prompt = build_prompt(&ctx, ScheduleType::Weekly, 8);
        assert!(prompt.contains("Templating with {job_json} and {schema}"));
        assert_eq!(prompt.matches("Frontend Engineer").count(), 1);
    }
}
