//! Media credential HTTP handlers.
//!
//! ```text
//! POST /api/lessons/{courseId}/{lessonId}/stream-url
//! POST /api/courses/{courseId}/pass
//! ```

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::Cookie;
use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{CourseId, Error, LessonId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

fn parse_course_id(raw: &str) -> Result<CourseId, Error> {
    CourseId::new(raw).map_err(|_| Error::invalid_request("courseId must be a UUID"))
}

fn parse_lesson_id(raw: &str) -> Result<LessonId, Error> {
    LessonId::new(raw).map_err(|_| Error::invalid_request("lessonId must be a UUID"))
}

/// Response payload for a signed single-lesson stream URL.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamUrlResponseBody {
    /// Signed URL carrying `Expires`, `Signature`, and `Key-Pair-Id`.
    pub url: String,
    /// Expiry as Unix epoch seconds.
    pub expires_at: i64,
}

/// Response payload accompanying the course-pass cookies.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoursePassResponseBody {
    /// Expiry of all three cookies as Unix epoch seconds.
    pub expires_at: i64,
}

/// Issue a signed streaming URL for one lesson.
///
/// Authorization, media-key resolution, and signing all happen inside the
/// media service; the lesson access is recorded before responding. A failed
/// access write is logged but does not withhold the credential.
#[utoipa::path(
    post,
    path = "/api/lessons/{course_id}/{lesson_id}/stream-url",
    params(
        ("course_id" = String, Path, format = "uuid", description = "Course identifier"),
        ("lesson_id" = String, Path, format = "uuid", description = "Lesson identifier")
    ),
    responses(
        (status = 200, description = "Signed stream URL issued", body = StreamUrlResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not enrolled", body = ErrorSchema),
        (status = 404, description = "Unknown course or lesson", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "createStreamUrl",
    security(("SessionCookie" = []))
)]
#[post("/lessons/{course_id}/{lesson_id}/stream-url")]
pub async fn create_stream_url(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<StreamUrlResponseBody>> {
    let learner_id = session.require_learner_id()?;
    let (raw_course, raw_lesson) = path.into_inner();
    let course_id = parse_course_id(&raw_course)?;
    let lesson_id = parse_lesson_id(&raw_lesson)?;

    let token = state
        .media
        .authorize_and_issue_resource_token(
            &learner_id,
            &course_id,
            &lesson_id,
            state.default_expiry_minutes,
        )
        .await?;

    // The access write happens before the response; a failure is observable
    // in the logs but must not withhold an already-authorized credential.
    if let Err(error) = state
        .progress
        .record_access(&learner_id, &course_id, &lesson_id)
        .await
    {
        warn!(
            learner_id = %learner_id,
            course_id = %course_id,
            lesson_id = %lesson_id,
            error = %error,
            "failed to record lesson access"
        );
    }

    Ok(web::Json(StreamUrlResponseBody {
        url: token.url,
        expires_at: token.expires_at,
    }))
}

/// Issue the whole-course cookie credential set.
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/pass",
    params(
        ("course_id" = String, Path, format = "uuid", description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Course pass cookies attached", body = CoursePassResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not enrolled", body = ErrorSchema),
        (status = 404, description = "Unknown course", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["media"],
    operation_id = "createCoursePass",
    security(("SessionCookie" = []))
)]
#[post("/courses/{course_id}/pass")]
pub async fn create_course_pass(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let learner_id = session.require_learner_id()?;
    let course_id = parse_course_id(&path.into_inner())?;

    let pass = state
        .media
        .authorize_and_issue_course_pass(&learner_id, &course_id)
        .await?;

    let expiry = OffsetDateTime::from_unix_timestamp(pass.expires_at)
        .map_err(|error| Error::internal(format!("invalid pass expiry: {error}")))?;
    let cookies = [
        ("CloudFront-Policy", pass.policy.clone()),
        ("CloudFront-Signature", pass.signature.clone()),
        ("CloudFront-Key-Pair-Id", pass.key_pair_id.clone()),
    ];

    let mut response = HttpResponse::Ok();
    for (name, value) in cookies {
        response.cookie(
            Cookie::build(name, value)
                .path(pass.path.clone())
                .secure(true)
                .http_only(true)
                .expires(expiry)
                .finish(),
        );
    }
    Ok(response.json(CoursePassResponseBody {
        expires_at: pass.expires_at,
    }))
}

#[cfg(test)]
#[path = "media_tests.rs"]
mod tests;
