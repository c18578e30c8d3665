//! Database row models for the persistence adapters.
//!
//! These structs mirror the tables in [`super::schema`] and stay private to
//! the persistence module. Enum-valued columns are stored as strings and
//! validated on the way out; a row that fails validation is a data defect,
//! not a transient error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{completed_lessons, course_progress, enrollments, meetup_signups};

/// A row from the `enrollments` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub kind: String,
    pub payment_status: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable enrollment row.
#[derive(Debug, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub kind: String,
    pub payment_status: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A row from the `course_progress` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = course_progress)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseProgressRow {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub last_accessed_lesson: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable progress header row; conflicts update the access columns.
#[derive(Debug, Insertable)]
#[diesel(table_name = course_progress)]
pub(crate) struct NewCourseProgressRow {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub last_accessed_lesson: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable completed-lesson membership row.
#[derive(Debug, Insertable)]
#[diesel(table_name = completed_lessons)]
pub(crate) struct NewCompletedLessonRow {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

/// A row from the `meetup_signups` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meetup_signups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MeetupSignupRow {
    pub learner_id: Uuid,
    pub meetup_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable meetup signup row.
#[derive(Debug, Insertable)]
#[diesel(table_name = meetup_signups)]
pub(crate) struct NewMeetupSignupRow {
    pub learner_id: Uuid,
    pub meetup_id: Uuid,
    pub created_at: DateTime<Utc>,
}
