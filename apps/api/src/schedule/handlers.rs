use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extraction::Structured;
use crate::schedule::service::{generate_learning_schedule, ScheduleRequest};
use crate::schemas::LearningSchedule;
use crate::state::AppState;

/// POST /api/v1/schedule/generate
/// Returns the validated schedule as the response body.
pub async fn handle_generate_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Structured<LearningSchedule>>, AppError> {
    req.validate()?;
    let schedule = generate_learning_schedule(
        &state.db,
        &state.agent,
        &req,
        state.config.schedule_max_retries,
    )
    .await?;
    Ok(Json(schedule))
}
