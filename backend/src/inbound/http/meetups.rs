//! Community meetup HTTP handlers.
//!
//! ```text
//! GET  /api/meetups
//! POST /api/meetups/{eventId}/signup
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::UpcomingMeetup;
use crate::domain::{Error, MeetupId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One meetup listing entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetupBody {
    /// Stable meetup identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Host name.
    pub host: String,
    /// Contact address.
    pub contact: String,
    /// Next start, RFC 3339 with the schedule-timezone offset.
    #[schema(example = "2026-09-01T18:00:00+02:00")]
    pub next_occurrence: String,
    /// Whether the meetup is live right now.
    pub is_live: bool,
    /// Length of the live window in minutes.
    pub duration_minutes: u32,
}

impl From<UpcomingMeetup> for MeetupBody {
    fn from(value: UpcomingMeetup) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            host: value.host,
            contact: value.contact,
            next_occurrence: value.next_occurrence,
            is_live: value.is_live,
            duration_minutes: value.duration_minutes,
        }
    }
}

/// List all recurring meetups with computed occurrence state.
///
/// The listing is public; no session is required.
#[utoipa::path(
    get,
    path = "/api/meetups",
    responses(
        (status = 200, description = "Meetup listing", body = [MeetupBody])
    ),
    tags = ["meetups"],
    operation_id = "listMeetups",
    security([])
)]
#[get("/meetups")]
pub async fn list_meetups(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<MeetupBody>>> {
    let listing = state.meetups.list_upcoming(state.clock.utc()).await?;
    Ok(web::Json(listing.into_iter().map(MeetupBody::from).collect()))
}

/// Record the authenticated learner's signup interest for a meetup.
#[utoipa::path(
    post,
    path = "/api/meetups/{event_id}/signup",
    params(
        ("event_id" = String, Path, format = "uuid", description = "Meetup identifier")
    ),
    responses(
        (status = 204, description = "Signup recorded (idempotent)"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown meetup", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["meetups"],
    operation_id = "signupForMeetup",
    security(("SessionCookie" = []))
)]
#[post("/meetups/{event_id}/signup")]
pub async fn signup_for_meetup(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let learner_id = session.require_learner_id()?;
    let meetup_id = MeetupId::new(path.into_inner())
        .map_err(|_| Error::invalid_request("eventId must be a UUID"))?;

    state.meetups.signup(&learner_id, &meetup_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "meetups_http_tests.rs"]
mod tests;
