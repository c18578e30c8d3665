//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{HttpResponse, Resource, web};

use crate::domain::{Error, LearnerId};
use crate::inbound::http::session::SessionContext;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route that logs a learner in by id, standing in for the identity
/// provider handlers tests do not exercise.
pub fn test_login_resource() -> Resource {
    web::resource("/test-login/{learner_id}").route(web::get().to(
        |session: SessionContext, path: web::Path<String>| async move {
            let id = LearnerId::new(path.into_inner())
                .map_err(|_| Error::invalid_request("learnerId must be a UUID"))?;
            session.persist_learner(&id)?;
            Ok::<_, Error>(HttpResponse::Ok())
        },
    ))
}

/// Log in through [`test_login_resource`] and return the session cookie.
pub async fn login_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    learner_id: &LearnerId,
) -> actix_web::cookie::Cookie<'static> {
    let request = actix_web::test::TestRequest::get()
        .uri(&format!("/test-login/{learner_id}"))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
