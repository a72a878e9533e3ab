use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::service::{
    get_resume, pdf_to_text, upload_resume, ResumeDetail, ResumeUploadResponse, CONTENT_TYPE_PDF,
    CONTENT_TYPE_TEXT,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResumeTextUpload {
    pub content: String,
}

/// POST /api/v1/resumes/upload
/// Accepts either multipart form data with a `file` field (PDF or plain text)
/// or a JSON body `{"content": "..."}`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (content, content_type) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_resume_file(multipart).await?
    } else {
        let Json(body) = Json::<ResumeTextUpload>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        (body.content, CONTENT_TYPE_TEXT)
    };

    let response = upload_resume(&state.db, &state.agent, &content, content_type).await?;
    Ok(Json(response))
}

async fn read_resume_file(mut multipart: Multipart) -> Result<(String, &'static str), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let is_pdf = field.content_type() == Some(CONTENT_TYPE_PDF)
            || field
                .file_name()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        return if is_pdf {
            Ok((pdf_to_text(data).await?, CONTENT_TYPE_PDF))
        } else {
            let text = String::from_utf8(data.to_vec())
                .map_err(|_| AppError::Validation("Resume file is not valid UTF-8 text".to_string()))?;
            Ok((text, CONTENT_TYPE_TEXT))
        };
    }

    Err(AppError::Validation("Multipart body has no 'file' field".to_string()))
}

/// GET /api/v1/resumes/:resume_id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetail>, AppError> {
    Ok(Json(get_resume(&state.db, resume_id).await?))
}
