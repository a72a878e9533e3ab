use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::{AgentManager, ProviderError};
use crate::errors::AppError;
use crate::extraction::{extract_once, Structured};
use crate::models::resume::{ProcessedResumeRow, ResumeRow};
use crate::resumes::prompts::build_prompt;
use crate::schemas::{resume, StructuredResume};

pub const CONTENT_TYPE_TEXT: &str = "text/plain";
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: String,
    pub resume_id: Uuid,
    /// False when the model output could not be validated; the raw text is
    /// stored either way.
    pub processed: bool,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetail {
    pub resume_id: Uuid,
    pub raw_resume: ResumeRow,
    pub processed_resume: Option<Value>,
}

/// Single-shot structuring of résumé text.
pub async fn extract_structured_resume(
    agent: &AgentManager,
    resume_text: &str,
) -> Result<Option<Structured<StructuredResume>>, ProviderError> {
    extract_once::<StructuredResume>(agent, resume::descriptor(), &build_prompt(resume_text)).await
}

/// Converts an uploaded PDF to plain text off the async executor.
pub async fn pdf_to_text(data: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;
    Ok(text)
}

/// Stores the raw résumé, then attempts structuring. The processed row is
/// written only when extraction produced a validated value.
pub async fn upload_resume(
    pool: &PgPool,
    agent: &AgentManager,
    content: &str,
    content_type: &str,
) -> Result<ResumeUploadResponse, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("Resume content is empty".to_string()));
    }

    let resume_id = Uuid::new_v4();
    sqlx::query("INSERT INTO resumes (resume_id, content, content_type) VALUES ($1, $2, $3)")
        .bind(resume_id)
        .bind(content)
        .bind(content_type)
        .execute(pool)
        .await?;

    let processed = match extract_structured_resume(agent, content).await? {
        Some(structured) => {
            store_processed_resume(pool, resume_id, &structured).await?;
            true
        }
        None => {
            warn!("Resume {resume_id} stored without structured data");
            false
        }
    };

    info!("Resume {resume_id} uploaded (processed: {processed})");
    Ok(ResumeUploadResponse {
        message: "data successfully processed".to_string(),
        resume_id,
        processed,
    })
}

async fn store_processed_resume(
    pool: &PgPool,
    resume_id: Uuid,
    structured: &Structured<StructuredResume>,
) -> Result<(), AppError> {
    let data = serde_json::to_value(structured)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode resume: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO processed_resumes (resume_id, data, extracted_keywords)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(resume_id)
    .bind(data)
    .bind(&structured.extracted_keywords)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn resume_exists(pool: &PgPool, resume_id: Uuid) -> Result<bool, AppError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resumes WHERE resume_id = $1)")
            .bind(resume_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn find_processed_resume(
    pool: &PgPool,
    resume_id: Uuid,
) -> Result<Option<ProcessedResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ProcessedResumeRow>(
        "SELECT * FROM processed_resumes WHERE resume_id = $1",
    )
    .bind(resume_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn get_resume(pool: &PgPool, resume_id: Uuid) -> Result<ResumeDetail, AppError> {
    let raw_resume =
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE resume_id = $1")
            .bind(resume_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let processed_resume = find_processed_resume(pool, resume_id)
        .await?
        .map(|row| row.data);

    Ok(ResumeDetail {
        resume_id,
        raw_resume,
        processed_resume,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::testing::ScriptedProvider;
    use crate::schemas::resume::fixtures::valid_resume_json;

    fn agent(provider: Arc<ScriptedProvider>) -> AgentManager {
        AgentManager::with_strategy_name(provider, "json").unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_resume() {
        let provider = Arc::new(ScriptedProvider::new([valid_resume_json().to_string()]));
        let structured = extract_structured_resume(&agent(provider.clone()), "resume text")
            .await
            .unwrap()
            .expect("resume should validate");
        assert!(!structured.extracted_keywords.is_empty());
        assert_eq!(provider.calls(), 1);
        assert!(provider.prompts()[0].contains("resume text"));
    }

    #[tokio::test]
    async fn test_missing_keywords_degrades_to_none() {
        let mut payload = valid_resume_json();
        payload["extractedKeywords"] = serde_json::json!([]);
        let provider = Arc::new(ScriptedProvider::new([payload.to_string()]));
        let result = extract_structured_resume(&agent(provider.clone()), "resume text")
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(provider.calls(), 1, "single-shot path never retries");
    }

    #[tokio::test]
    async fn test_prose_output_degrades_to_none() {
        let provider = Arc::new(ScriptedProvider::new(["I could not parse that resume."]));
        let result = extract_structured_resume(&agent(provider), "resume text")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(ScriptedProvider::from_results(vec![Err(
            ProviderError::EmptyContent,
        )]));
        let err = extract_structured_resume(&agent(provider), "resume text")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent));
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_a_validation_error() {
        let err = pdf_to_text(Bytes::from_static(b"not a pdf")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
