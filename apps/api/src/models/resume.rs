use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw résumé text as uploaded. Kept even when extraction fails.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub resume_id: Uuid,
    pub content: String,
    /// "text/plain" or "application/pdf"
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Validated `StructuredResume`, stored as JSONB in its wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessedResumeRow {
    pub resume_id: Uuid,
    pub data: Value,
    pub extracted_keywords: Vec<String>,
    pub processed_at: DateTime<Utc>,
}
