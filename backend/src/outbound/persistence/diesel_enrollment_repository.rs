//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel.
//!
//! Enrollment rows store their enum columns as strings; rows with
//! unrecognised values are reported as query errors rather than silently
//! skipped, since a corrupted payment status must never grant access.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{CourseId, Enrollment, LearnerId};

use super::models::{EnrollmentRow, NewEnrollmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::enrollments;

/// Diesel-backed implementation of the `EnrollmentRepository` port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain enrollment repository errors.
fn map_pool_error(error: PoolError) -> EnrollmentRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            EnrollmentRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain enrollment repository errors.
fn map_diesel_error(error: diesel::result::Error) -> EnrollmentRepositoryError {
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
            EnrollmentRepositoryError::connection("database connection error")
        }
        _ => EnrollmentRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain enrollment, validating enum columns.
fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment, EnrollmentRepositoryError> {
    let kind = row.kind.parse().map_err(|err| {
        EnrollmentRepositoryError::query(format!("corrupted enrollment row: {err}"))
    })?;
    let payment_status = row.payment_status.parse().map_err(|err| {
        EnrollmentRepositoryError::query(format!("corrupted enrollment row: {err}"))
    })?;

    Ok(Enrollment {
        learner_id: LearnerId::from_uuid(row.learner_id),
        course_id: CourseId::from_uuid(row.course_id),
        kind,
        payment_status,
        completed: row.completed,
        created_at: row.created_at,
    })
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn find(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EnrollmentRow> = enrollments::table
            .filter(enrollments::learner_id.eq(learner_id.as_uuid()))
            .filter(enrollments::course_id.eq(course_id.as_uuid()))
            .select(EnrollmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_enrollment).transpose()
    }

    async fn save(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewEnrollmentRow {
            learner_id: *enrollment.learner_id.as_uuid(),
            course_id: *enrollment.course_id.as_uuid(),
            kind: enrollment.kind.to_string(),
            payment_status: enrollment.payment_status.to_string(),
            completed: enrollment.completed,
            created_at: enrollment.created_at,
        };

        diesel::insert_into(enrollments::table)
            .values(&new_row)
            .on_conflict((enrollments::learner_id, enrollments::course_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Row validation coverage; query behaviour is exercised against the
    //! in-memory adapter and a live database in integration environments.

    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(kind: &str, payment_status: &str) -> EnrollmentRow {
        EnrollmentRow {
            learner_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            kind: kind.to_owned(),
            payment_status: payment_status.to_owned(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_row_converts_to_domain_enrollment() {
        let enrollment = row_to_enrollment(row("paid", "completed")).expect("valid row");
        assert!(enrollment.grants_access());
    }

    #[rstest]
    #[case("subscription", "completed")]
    #[case("paid", "refunded")]
    fn corrupted_enum_column_is_a_query_error(#[case] kind: &str, #[case] status: &str) {
        let error = row_to_enrollment(row(kind, status)).expect_err("corrupted row");
        assert!(matches!(error, EnrollmentRepositoryError::Query { .. }));
    }
}
