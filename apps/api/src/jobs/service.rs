use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::{AgentManager, EmbeddingManager, ProviderError};
use crate::errors::AppError;
use crate::extraction::{extract_once, Structured};
use crate::jobs::matching;
use crate::jobs::prompts::build_prompt;
use crate::models::job::{JobRow, ProcessedJobRow};
use crate::resumes::service::{find_processed_resume, resume_exists};
use crate::schemas::{job, StructuredJob};

#[derive(Debug, Deserialize)]
pub struct JobUploadRequest {
    pub resume_id: Uuid,
    pub job_descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobUploadResponse {
    pub message: String,
    pub job_id: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct JobDetail {
    pub job_id: Uuid,
    pub raw_job: JobRow,
    pub processed_job: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: Uuid,
    pub resume_id: Uuid,
    pub similarity: f32,
    pub embedding_provider: &'static str,
}

/// Single-shot structuring of a job posting.
pub async fn extract_structured_job(
    agent: &AgentManager,
    job_text: &str,
) -> Result<Option<Structured<StructuredJob>>, ProviderError> {
    extract_once::<StructuredJob>(agent, job::descriptor(), &build_prompt(job_text)).await
}

/// Structures every description in order, one model call each. Runs before
/// any database work so no connection is held while the model responds.
pub async fn structure_jobs(
    agent: &AgentManager,
    descriptions: &[String],
) -> Result<Vec<Option<Structured<StructuredJob>>>, ProviderError> {
    let mut structured = Vec::with_capacity(descriptions.len());
    for description in descriptions {
        structured.push(extract_structured_job(agent, description).await?);
    }
    Ok(structured)
}

/// Stores each description as a raw job linked to `resume_id`, along with
/// its structured form when extraction succeeded. All rows are committed
/// together.
pub async fn create_and_store_jobs(
    pool: &PgPool,
    agent: &AgentManager,
    request: &JobUploadRequest,
) -> Result<Vec<Uuid>, AppError> {
    let resume_id = request.resume_id;
    if !resume_exists(pool, resume_id).await? {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    if find_processed_resume(pool, resume_id).await?.is_none() {
        warn!("Processed resume not found for resume {resume_id}");
    }

    let extracted = structure_jobs(agent, &request.job_descriptions).await?;

    let mut tx = pool.begin().await?;
    let mut job_ids = Vec::with_capacity(request.job_descriptions.len());

    for (description, structured) in request.job_descriptions.iter().zip(&extracted) {
        let job_id = Uuid::new_v4();
        sqlx::query("INSERT INTO jobs (job_id, content) VALUES ($1, $2)")
            .bind(job_id)
            .bind(description)
            .execute(&mut *tx)
            .await?;
        link_job_to_resume(&mut *tx, job_id, resume_id).await?;

        match structured {
            Some(structured) => store_processed_job(&mut tx, job_id, structured).await?,
            None => warn!("Job {job_id} stored without structured data"),
        }

        info!("Job {job_id} created and associated with resume {resume_id}");
        job_ids.push(job_id);
    }

    tx.commit().await?;
    Ok(job_ids)
}

/// Idempotent job↔résumé association.
async fn link_job_to_resume(
    executor: impl PgExecutor<'_>,
    job_id: Uuid,
    resume_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO job_resume (job_id, resume_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(job_id)
    .bind(resume_id)
    .execute(executor)
    .await?;
    Ok(())
}

async fn store_processed_job(
    tx: &mut Transaction<'_, Postgres>,
    job_id: Uuid,
    structured: &Structured<StructuredJob>,
) -> Result<(), AppError> {
    let data = serde_json::to_value(structured)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode job: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO processed_jobs (job_id, job_title, data, extracted_keywords)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(job_id)
    .bind(&structured.job_title)
    .bind(data)
    .bind(&structured.extracted_keywords)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn find_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE job_id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn find_processed_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Option<ProcessedJobRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ProcessedJobRow>("SELECT * FROM processed_jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<JobDetail, AppError> {
    let raw_job = find_job(pool, job_id).await?;
    let processed_job = find_processed_job(pool, job_id).await?.map(|row| row.data);

    Ok(JobDetail {
        job_id,
        raw_job,
        processed_job,
    })
}

/// Scores a résumé against a job by embedding their raw texts.
pub async fn match_resume_to_job(
    pool: &PgPool,
    embedder: &EmbeddingManager,
    job_id: Uuid,
    resume_id: Uuid,
) -> Result<MatchResponse, AppError> {
    let job = find_job(pool, job_id).await?;
    let resume_text: String =
        sqlx::query_scalar("SELECT content FROM resumes WHERE resume_id = $1")
            .bind(resume_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    link_job_to_resume(pool, job_id, resume_id).await?;

    let similarity = matching::similarity(embedder, &resume_text, &job.content).await?;
    info!("Resume {resume_id} vs job {job_id}: similarity {similarity:.3}");

    Ok(MatchResponse {
        job_id,
        resume_id,
        similarity,
        embedding_provider: embedder.provider_name(),
    })
}
