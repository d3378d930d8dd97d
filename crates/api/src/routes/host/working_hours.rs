use axum::{extract::State, Json};
use chrono::NaiveTime;
use db::{CreateWorkingHours, WorkingHours, WorkingHoursRepository};
use serde::Deserialize;

use crate::auth::Session;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WorkingHoursRow {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceScheduleRequest {
    pub rows: Vec<WorkingHoursRow>,
}

/// GET /api/host/working-hours
pub async fn list_working_hours(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<WorkingHours>>> {
    let rows = WorkingHoursRepository::find_by_host(&state.pool, session.host_id).await?;
    Ok(Json(rows))
}

/// PUT /api/host/working-hours — replaces the host's entire weekly
/// schedule (spec.md §3: multiple rows per day form a union, so there
/// is no natural per-day key to upsert on).
pub async fn replace_working_hours(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ReplaceScheduleRequest>,
) -> ApiResult<Json<Vec<WorkingHours>>> {
    let rows = body
        .rows
        .into_iter()
        .map(|row| CreateWorkingHours {
            host_id: session.host_id,
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        })
        .collect();

    let saved = WorkingHoursRepository::replace_schedule(&state.pool, session.host_id, rows).await?;
    Ok(Json(saved))
}
