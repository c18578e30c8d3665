//! Tests for meetup HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use mockable::MockClock;
use serde_json::Value;

use super::*;
use crate::domain::LearnerId;
use crate::domain::ports::{MockMediaAccess, MockMeetups, MockProgressTracking};
use crate::inbound::http::test_utils::{login_as, test_login_resource, test_session_middleware};

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().returning(|| {
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0)
            .single()
            .expect("valid instant")
    });
    Arc::new(clock)
}

fn state_with(meetups: MockMeetups) -> HttpState {
    HttpState {
        media: Arc::new(MockMediaAccess::new()),
        progress: Arc::new(MockProgressTracking::new()),
        meetups: Arc::new(meetups),
        clock: fixed_clock(),
        default_expiry_minutes: 10,
    }
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(test_login_resource())
        .service(
            web::scope("/api")
                .service(list_meetups)
                .service(signup_for_meetup),
        )
}

#[actix_web::test]
async fn listing_is_public_and_carries_occurrence_state() {
    let meetup_id = MeetupId::random();
    let entry = UpcomingMeetup {
        id: meetup_id.clone(),
        title: "Weekly study hall".into(),
        host: "Maya".into(),
        contact: "maya@studyhall.example".into(),
        next_occurrence: "2026-08-25T18:00:00+02:00".into(),
        is_live: false,
        duration_minutes: 90,
    };
    let mut meetups = MockMeetups::new();
    meetups
        .expect_list_upcoming()
        .times(1)
        .return_once(move |_| Ok(vec![entry]));

    let app = actix_test::init_service(test_app(state_with(meetups))).await;

    // No session cookie on purpose.
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/meetups").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let listing = body.as_array().expect("array body");
    assert_eq!(listing.len(), 1);
    assert_eq!(
        listing[0].get("id").and_then(Value::as_str),
        Some(meetup_id.as_ref())
    );
    assert_eq!(
        listing[0].get("nextOccurrence").and_then(Value::as_str),
        Some("2026-08-25T18:00:00+02:00")
    );
    assert_eq!(listing[0].get("isLive").and_then(Value::as_bool), Some(false));
}

#[actix_web::test]
async fn signup_returns_no_content() {
    let mut meetups = MockMeetups::new();
    meetups.expect_signup().times(1).returning(|_, _| Ok(()));

    let app = actix_test::init_service(test_app(state_with(meetups))).await;
    let cookie = login_as(&app, &LearnerId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/meetups/{}/signup", MeetupId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn signup_requires_a_session() {
    let app = actix_test::init_service(test_app(state_with(MockMeetups::new()))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/meetups/{}/signup", MeetupId::random()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn signup_for_unknown_meetup_is_not_found() {
    let mut meetups = MockMeetups::new();
    meetups
        .expect_signup()
        .times(1)
        .returning(|_, meetup_id| Err(Error::not_found(format!("meetup {meetup_id} not found"))));

    let app = actix_test::init_service(test_app(state_with(meetups))).await;
    let cookie = login_as(&app, &LearnerId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/meetups/{}/signup", MeetupId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
