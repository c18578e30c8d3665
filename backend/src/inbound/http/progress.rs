//! Progress tracking HTTP handlers.
//!
//! ```text
//! POST /api/progress/{courseId}/{lessonId}/complete
//! GET  /api/progress/{courseId}
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CourseId, Error, LessonId, ProgressSnapshot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn parse_course_id(raw: &str) -> Result<CourseId, Error> {
    CourseId::new(raw).map_err(|_| Error::invalid_request("courseId must be a UUID"))
}

fn parse_lesson_id(raw: &str) -> Result<LessonId, Error> {
    LessonId::new(raw).map_err(|_| Error::invalid_request("lessonId must be a UUID"))
}

/// Progress snapshot payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshotBody {
    /// Completed lesson identifiers.
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub completed_lessons: Vec<String>,
    /// Most recently accessed or completed lesson, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<uuid::Uuid>)]
    pub last_accessed_lesson: Option<String>,
    /// Whole-course completion percentage, rounded half-up.
    pub percentage: u8,
}

impl From<ProgressSnapshot> for ProgressSnapshotBody {
    fn from(value: ProgressSnapshot) -> Self {
        Self {
            completed_lessons: value
                .completed_lessons
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            last_accessed_lesson: value.last_accessed_lesson.map(|id| id.to_string()),
            percentage: value.percentage,
        }
    }
}

/// Record a lesson completion for the authenticated learner.
#[utoipa::path(
    post,
    path = "/api/progress/{course_id}/{lesson_id}/complete",
    params(
        ("course_id" = String, Path, format = "uuid", description = "Course identifier"),
        ("lesson_id" = String, Path, format = "uuid", description = "Lesson identifier")
    ),
    responses(
        (status = 200, description = "Completion recorded", body = ProgressSnapshotBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown course or lesson", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["progress"],
    operation_id = "completeLesson",
    security(("SessionCookie" = []))
)]
#[post("/progress/{course_id}/{lesson_id}/complete")]
pub async fn complete_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<ProgressSnapshotBody>> {
    let learner_id = session.require_learner_id()?;
    let (raw_course, raw_lesson) = path.into_inner();
    let course_id = parse_course_id(&raw_course)?;
    let lesson_id = parse_lesson_id(&raw_lesson)?;

    let snapshot = state
        .progress
        .record_completion(&learner_id, &course_id, &lesson_id)
        .await?;
    Ok(web::Json(ProgressSnapshotBody::from(snapshot)))
}

/// Read the authenticated learner's progress for a course.
#[utoipa::path(
    get,
    path = "/api/progress/{course_id}",
    params(
        ("course_id" = String, Path, format = "uuid", description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Current snapshot, zero state when no progress exists", body = ProgressSnapshotBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["progress"],
    operation_id = "getProgress",
    security(("SessionCookie" = []))
)]
#[get("/progress/{course_id}")]
pub async fn get_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProgressSnapshotBody>> {
    let learner_id = session.require_learner_id()?;
    let course_id = parse_course_id(&path.into_inner())?;

    let snapshot = state.progress.get_snapshot(&learner_id, &course_id).await?;
    Ok(web::Json(ProgressSnapshotBody::from(snapshot)))
}

#[cfg(test)]
#[path = "progress_http_tests.rs"]
mod tests;
