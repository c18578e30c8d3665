//! Domain primitives, entities, and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload and category.
//! - Enrollment, PaymentStatus, EnrollmentKind — course access rights.
//! - ProgressRecord, ProgressSnapshot — per-learner completion state.
//! - RecurringMeetup — weekly community event configuration.
//! - EnrollmentGate, ProgressService, MeetupService, media::MediaService —
//!   the services behind the driving ports in [`ports`].

pub mod enrollment;
pub mod enrollment_gate;
pub mod error;
pub mod ids;
pub mod media;
pub mod meetup;
pub mod meetup_service;
pub mod ports;
pub mod progress;
pub mod progress_service;
pub mod trace_id;

pub use self::enrollment::{Enrollment, EnrollmentKind, PaymentStatus};
pub use self::enrollment_gate::EnrollmentGate;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CourseId, LearnerId, LessonId, MeetupId};
pub use self::meetup::{MeetupFixtureError, MeetupSignup, RecurringMeetup};
pub use self::meetup_service::MeetupService;
pub use self::progress::{ProgressRecord, ProgressSnapshot, completion_percentage};
pub use self::progress_service::ProgressService;
pub use self::trace_id::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "Trace-Id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use studyhall_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("not enrolled"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
