//! PostgreSQL-backed `ProgressRepository` implementation using Diesel.
//!
//! Completion state is split across two tables: a `course_progress` header
//! row per (learner, course) pair and one `completed_lessons` membership row
//! per completed lesson. The composite primary key on the membership table
//! carries the set semantics; `INSERT .. ON CONFLICT DO NOTHING` makes
//! re-completion idempotent without a read-modify-write cycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ProgressRepository, ProgressRepositoryError};
use crate::domain::{CourseId, LearnerId, LessonId, ProgressRecord};

use super::models::{CourseProgressRow, NewCompletedLessonRow, NewCourseProgressRow};
use super::pool::{DbPool, PoolError};
use super::schema::{completed_lessons, course_progress};

/// Diesel-backed implementation of the `ProgressRepository` port.
#[derive(Clone)]
pub struct DieselProgressRepository {
    pool: DbPool,
}

impl DieselProgressRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain progress repository errors.
fn map_pool_error(error: PoolError) -> ProgressRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProgressRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain progress repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ProgressRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProgressRepositoryError::connection("database connection error")
        }
        _ => ProgressRepositoryError::query("database error"),
    }
}

/// Combine a header row with its membership rows into a domain record.
fn rows_to_record(header: CourseProgressRow, lessons: Vec<Uuid>) -> ProgressRecord {
    ProgressRecord {
        learner_id: LearnerId::from_uuid(header.learner_id),
        course_id: CourseId::from_uuid(header.course_id),
        completed_lessons: lessons.into_iter().map(LessonId::from_uuid).collect(),
        last_accessed_lesson: header.last_accessed_lesson.map(LessonId::from_uuid),
        updated_at: header.updated_at,
    }
}

/// Upsert the header row, setting the access columns on conflict.
async fn upsert_header(
    conn: &mut diesel_async::AsyncPgConnection,
    learner: Uuid,
    course: Uuid,
    lesson: Uuid,
    at: DateTime<Utc>,
) -> Result<(), diesel::result::Error> {
    diesel::insert_into(course_progress::table)
        .values(&NewCourseProgressRow {
            learner_id: learner,
            course_id: course,
            last_accessed_lesson: Some(lesson),
            updated_at: at,
        })
        .on_conflict((course_progress::learner_id, course_progress::course_id))
        .do_update()
        .set((
            course_progress::last_accessed_lesson.eq(Some(lesson)),
            course_progress::updated_at.eq(at),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl ProgressRepository for DieselProgressRepository {
    async fn append_completion(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<ProgressRecord, ProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let learner = *learner_id.as_uuid();
        let course = *course_id.as_uuid();
        let lesson = *lesson_id.as_uuid();

        // One transaction covers the header upsert, the set insert, and the
        // re-read, so the returned record reflects exactly this append and
        // concurrent appends cannot lose set members.
        let (header, lessons) = conn
            .transaction(|conn| {
                async move {
                    upsert_header(conn, learner, course, lesson, at).await?;

                    diesel::insert_into(completed_lessons::table)
                        .values(&NewCompletedLessonRow {
                            learner_id: learner,
                            course_id: course,
                            lesson_id: lesson,
                            completed_at: at,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;

                    let header: CourseProgressRow = course_progress::table
                        .filter(course_progress::learner_id.eq(learner))
                        .filter(course_progress::course_id.eq(course))
                        .select(CourseProgressRow::as_select())
                        .first(conn)
                        .await?;

                    let lessons: Vec<Uuid> = completed_lessons::table
                        .filter(completed_lessons::learner_id.eq(learner))
                        .filter(completed_lessons::course_id.eq(course))
                        .order_by(completed_lessons::completed_at)
                        .select(completed_lessons::lesson_id)
                        .load(conn)
                        .await?;

                    Ok((header, lessons))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_record(header, lessons))
    }

    async fn touch_access(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<(), ProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        upsert_header(
            &mut conn,
            *learner_id.as_uuid(),
            *course_id.as_uuid(),
            *lesson_id.as_uuid(),
            at,
        )
        .await
        .map_err(map_diesel_error)
    }

    async fn fetch(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let learner = *learner_id.as_uuid();
        let course = *course_id.as_uuid();

        let header: Option<CourseProgressRow> = course_progress::table
            .filter(course_progress::learner_id.eq(learner))
            .filter(course_progress::course_id.eq(course))
            .select(CourseProgressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lessons: Vec<Uuid> = completed_lessons::table
            .filter(completed_lessons::learner_id.eq(learner))
            .filter(completed_lessons::course_id.eq(course))
            .order_by(completed_lessons::completed_at)
            .select(completed_lessons::lesson_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Some(rows_to_record(header, lessons)))
    }
}
