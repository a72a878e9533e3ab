//! Learning schedule generation: the retry-loop path.
//!
//! Unlike job and résumé structuring, a schedule is the response body itself,
//! so a generation that never validates is surfaced as an error instead of
//! degrading to "no data".

use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::agent::{AgentManager, GenerationOptions};
use crate::errors::AppError;
use crate::extraction::{ExtractionError, ExtractionLoop, Structured, ValidationErrors};
use crate::jobs::service::find_processed_job;
use crate::resumes::service::find_processed_resume;
use crate::schedule::prompts::build_prompt;
use crate::schemas::{schedule, LearningSchedule, ScheduleType, StructuredJob, StructuredResume};

pub const MIN_DURATION_WEEKS: u32 = 1;
pub const MAX_DURATION_WEEKS: u32 = 52;

/// Completion budget for one schedule attempt.
const SCHEDULE_MAX_TOKENS: u32 = 8192;

fn default_duration_weeks() -> u32 {
    8
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: u32,
}

impl ScheduleRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_DURATION_WEEKS..=MAX_DURATION_WEEKS).contains(&self.duration_weeks) {
            return Err(AppError::Validation(format!(
                "durationWeeks must be between {MIN_DURATION_WEEKS} and {MAX_DURATION_WEEKS}, got {}",
                self.duration_weeks
            )));
        }
        Ok(())
    }
}

/// The résumé/job material a schedule prompt is built from.
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    pub resume: Value,
    pub job: Value,
    pub resume_keywords: Vec<String>,
    pub job_keywords: Vec<String>,
}

impl ScheduleContext {
    pub fn new(resume: &StructuredResume, job: &StructuredJob) -> Self {
        Self {
            resume: json!({
                "personalData": resume.personal_data,
                "experiences": resume.experiences,
                "projects": resume.projects,
                "skills": resume.skills,
                "education": resume.education,
            }),
            job: json!({
                "jobTitle": job.job_title,
                "companyProfile": job.company_profile,
                "keyResponsibilities": job.key_responsibilities,
                "qualifications": job.qualifications,
                "compensationAndBenefits": job.compensation_and_benefits,
            }),
            resume_keywords: resume.extracted_keywords.clone(),
            job_keywords: job.extracted_keywords.clone(),
        }
    }
}

/// One `- keyword` line per entry.
pub fn keyword_bullets(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("- {k}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs the bounded retry loop for a schedule. A schedule whose
/// `scheduleType` differs from the requested one counts as a failed attempt.
pub async fn generate_schedule(
    agent: &AgentManager,
    context: &ScheduleContext,
    schedule_type: ScheduleType,
    duration_weeks: u32,
    max_attempts: u32,
) -> Result<Structured<LearningSchedule>, ExtractionError> {
    let prompt = build_prompt(context, schedule_type, duration_weeks);

    ExtractionLoop::new(agent, schedule::descriptor(), max_attempts)
        .with_options(GenerationOptions::default().with_max_tokens(SCHEDULE_MAX_TOKENS))
        .run_with(&prompt, |candidate: &LearningSchedule| {
            let mut errors = ValidationErrors::new();
            if candidate.schedule_type != schedule_type {
                errors.push(
                    "scheduleType",
                    format!(
                        "expected '{}', got '{}'",
                        schedule_type.as_str(),
                        candidate.schedule_type.as_str()
                    ),
                );
            }
            errors.into_result()
        })
        .await
}

/// Loads the processed résumé and job, then generates the schedule.
pub async fn generate_learning_schedule(
    pool: &PgPool,
    agent: &AgentManager,
    request: &ScheduleRequest,
    max_attempts: u32,
) -> Result<Structured<LearningSchedule>, AppError> {
    let resume_row = find_processed_resume(pool, request.resume_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Processed resume not found for resume {}. Upload and process the resume first.",
                request.resume_id
            ))
        })?;
    let job_row = find_processed_job(pool, request.job_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Processed job not found for job {}. Upload and process the job first.",
            request.job_id
        ))
    })?;

    let resume: StructuredResume = serde_json::from_value(resume_row.data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored resume is unreadable: {e}")))?;
    let job: StructuredJob = serde_json::from_value(job_row.data)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored job is unreadable: {e}")))?;

    info!(
        "Generating learning schedule for resume={}, job={}, type={}",
        request.resume_id,
        request.job_id,
        request.schedule_type.as_str()
    );

    let context = ScheduleContext::new(&resume, &job);
    let schedule = generate_schedule(
        agent,
        &context,
        request.schedule_type,
        request.duration_weeks,
        max_attempts,
    )
    .await?;

    info!("Learning schedule generated for resume={}", request.resume_id);
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::testing::ScriptedProvider;
    use crate::agent::ProviderError;
    use crate::extraction::{validate, AttemptFailure, GenerationError};
    use crate::schemas::job::fixtures::valid_job_json;
    use crate::schemas::resume::fixtures::valid_resume_json;
    use crate::schemas::schedule::fixtures::valid_schedule_json;

    fn agent(provider: Arc<ScriptedProvider>) -> AgentManager {
        AgentManager::with_strategy_name(provider, "json").unwrap()
    }

    fn context() -> ScheduleContext {
        let resume = validate::<StructuredResume>(valid_resume_json()).unwrap();
        let job = validate::<StructuredJob>(valid_job_json()).unwrap();
        ScheduleContext::new(&resume, &job)
    }

    #[tokio::test]
    async fn test_valid_on_third_attempt_after_two_malformed() {
        let provider = Arc::new(ScriptedProvider::new([
            "Sure! Here is your plan: week one, learn React.".to_string(),
            r#"{"scheduleType": "weekly", "schedule": [}"#.to_string(),
            valid_schedule_json().to_string(),
        ]));
        let schedule = generate_schedule(&agent(provider.clone()), &context(), ScheduleType::Weekly, 8, 3)
            .await
            .unwrap();

        assert_eq!(provider.calls(), 3);
        assert_eq!(schedule.schedule_type, ScheduleType::Weekly);

        let prompts = provider.prompts();
        assert!(prompts.iter().all(|p| p == &prompts[0]), "prompt must not change between retries");
    }

    #[tokio::test]
    async fn test_bare_array_every_time_is_malformed_shape() {
        let reply = serde_json::json!([valid_schedule_json()["schedule"][0]]).to_string();
        let provider = Arc::new(ScriptedProvider::repeating(reply));
        let err = generate_schedule(&agent(provider.clone()), &context(), ScheduleType::Weekly, 8, 3)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExtractionError::Generation(GenerationError::MalformedShape { attempts: 3 })
        ));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_wrong_schedule_type_is_retried() {
        let mut monthly = valid_schedule_json();
        monthly["scheduleType"] = serde_json::json!("monthly");
        let provider = Arc::new(ScriptedProvider::new([
            monthly.to_string(),
            valid_schedule_json().to_string(),
        ]));
        let schedule = generate_schedule(&agent(provider.clone()), &context(), ScheduleType::Weekly, 8, 3)
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(schedule.schedule_type, ScheduleType::Weekly);
    }

    #[tokio::test]
    async fn test_learning_schedule_wrapper_is_unwrapped() {
        let reply = serde_json::json!({ "learning_schedule": valid_schedule_json() }).to_string();
        let provider = Arc::new(ScriptedProvider::new([reply]));
        let schedule = generate_schedule(&agent(provider.clone()), &context(), ScheduleType::Weekly, 8, 3)
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(schedule.schedule_type, ScheduleType::Weekly);
    }

    #[tokio::test]
    async fn test_exhausted_history_records_every_attempt() {
        let mut bad = valid_schedule_json();
        bad["schedule"][0]["activities"][0]["priority"] = serde_json::json!("Urgent");
        let provider = Arc::new(ScriptedProvider::repeating(bad.to_string()));
        let err = generate_schedule(&agent(provider), &context(), ScheduleType::Weekly, 8, 2)
            .await
            .unwrap_err();

        match err {
            ExtractionError::Generation(GenerationError::Exhausted { attempts, history, .. }) => {
                assert_eq!(attempts, 2);
                assert_eq!(history.len(), 2);
                assert!(history
                    .iter()
                    .all(|a| matches!(a.failure, AttemptFailure::Invalid(_))));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_failure_stops_the_loop() {
        let provider = Arc::new(ScriptedProvider::from_results(vec![Err(
            ProviderError::MissingCredential { provider: "openai" },
        )]));
        let err = generate_schedule(&agent(provider.clone()), &context(), ScheduleType::Weekly, 8, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Provider(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_context_carries_keywords_and_sections() {
        let context = context();
        assert!(!context.resume_keywords.is_empty());
        assert_eq!(context.job["jobTitle"], "Backend Engineer");
        assert!(context.resume.get("personalData").is_some());
        assert!(context.resume.get("achievements").is_none());
    }

    #[test]
    fn test_keyword_bullets() {
        let keywords = vec!["Rust".to_string(), "SQL".to_string()];
        assert_eq!(keyword_bullets(&keywords), "- Rust\n- SQL");
        assert_eq!(keyword_bullets(&[]), "");
    }

    #[test]
    fn test_request_defaults() {
        let request: ScheduleRequest = serde_json::from_value(serde_json::json!({
            "resumeId": Uuid::nil(),
            "jobId": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(request.schedule_type, ScheduleType::Weekly);
        assert_eq!(request.duration_weeks, 8);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_duration_bounds() {
        let mut request = ScheduleRequest {
            resume_id: Uuid::nil(),
            job_id: Uuid::nil(),
            schedule_type: ScheduleType::Monthly,
            duration_weeks: 0,
        };
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
        request.duration_weeks = 53;
        assert!(request.validate().is_err());
        request.duration_weeks = 52;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_unknown_schedule_type() {
        let result = serde_json::from_value::<ScheduleRequest>(serde_json::json!({
            "resumeId": Uuid::nil(),
            "jobId": Uuid::nil(),
            "scheduleType": "daily",
        }));
        assert!(result.is_err());
    }
}
