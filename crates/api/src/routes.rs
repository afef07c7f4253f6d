use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use learnify_core::model::{ActivityEntry, CourseId, CourseProgressSummary, LessonProgressId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;

//
// ─── RESPONSE BODIES ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgressResponse {
    pub progress: f64,
    pub completed_lessons: u32,
    pub total_lessons: u32,
}

impl From<CourseProgressSummary> for CourseProgressResponse {
    fn from(summary: CourseProgressSummary) -> Self {
        Self {
            progress: summary.progress_percent(),
            completed_lessons: summary.completed_lessons(),
            total_lessons: summary.total_lessons(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntryResponse {
    pub id: LessonProgressId,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub details: Option<String>,
}

impl From<ActivityEntry> for ActivityEntryResponse {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            id: entry.id,
            kind: entry.kind,
            name: entry.name,
            created_at: entry.created_at,
            details: entry.details,
        }
    }
}

//
// ─── HANDLERS ──────────────────────────────────────────────────────────────────
//

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn course_progress(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_course_id): Path<String>,
) -> Result<Json<CourseProgressResponse>, ApiError> {
    let course_id: CourseId = raw_course_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid course id: {raw_course_id}")))?;

    let summary = state.progress.course_progress(user.id, course_id).await?;
    Ok(Json(summary.into()))
}

pub async fn recent_activity(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ActivityEntryResponse>>, ApiError> {
    let entries = state.progress.recent_activity(user.id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
