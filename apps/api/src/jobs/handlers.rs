use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::service::{
    create_and_store_jobs, get_job, match_resume_to_job, JobDetail, JobUploadRequest,
    JobUploadResponse, MatchResponse,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResumeIdQuery {
    pub resume_id: Uuid,
}

/// POST /api/v1/jobs/upload
pub async fn handle_upload_jobs(
    State(state): State<AppState>,
    Json(req): Json<JobUploadRequest>,
) -> Result<Json<JobUploadResponse>, AppError> {
    validate_upload(&req)?;
    let job_id = create_and_store_jobs(&state.db, &state.agent, &req).await?;
    Ok(Json(JobUploadResponse {
        message: "data successfully processed".to_string(),
        job_id,
    }))
}

fn validate_upload(req: &JobUploadRequest) -> Result<(), AppError> {
    if req.job_descriptions.is_empty() {
        return Err(AppError::Validation(
            "job_descriptions must contain at least one entry".to_string(),
        ));
    }
    if let Some(i) = req.job_descriptions.iter().position(|d| d.trim().is_empty()) {
        return Err(AppError::Validation(format!("job_descriptions[{i}] is empty")));
    }
    Ok(())
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    Ok(Json(get_job(&state.db, job_id).await?))
}

/// POST /api/v1/jobs/:job_id/match?resume_id=
pub async fn handle_match_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<ResumeIdQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let embedder = state.embedder.as_deref().ok_or_else(|| {
        AppError::ServiceUnavailable("No embedding provider is configured".to_string())
    })?;
    let response = match_resume_to_job(&state.db, embedder, job_id, params.resume_id).await?;
    Ok(Json(response))
}
