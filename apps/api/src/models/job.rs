use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub job_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated `StructuredJob`, stored as JSONB in its wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessedJobRow {
    pub job_id: Uuid,
    pub job_title: String,
    pub data: Value,
    pub extracted_keywords: Vec<String>,
    pub processed_at: DateTime<Utc>,
}
