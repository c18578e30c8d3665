//! PostgreSQL-backed `MeetupSignupRepository` implementation using Diesel.
//!
//! Signups are bare (learner, meetup) pairs; the composite primary key plus
//! `ON CONFLICT DO NOTHING` makes repeat signups idempotent and preserves
//! the original `created_at`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MeetupSignupRepository, MeetupSignupRepositoryError};
use crate::domain::{LearnerId, MeetupId, MeetupSignup};

use super::models::{MeetupSignupRow, NewMeetupSignupRow};
use super::pool::{DbPool, PoolError};
use super::schema::meetup_signups;

/// Diesel-backed implementation of the `MeetupSignupRepository` port.
#[derive(Clone)]
pub struct DieselMeetupSignupRepository {
    pool: DbPool,
}

impl DieselMeetupSignupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain signup repository errors.
fn map_pool_error(error: PoolError) -> MeetupSignupRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MeetupSignupRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain signup repository errors.
fn map_diesel_error(error: diesel::result::Error) -> MeetupSignupRepositoryError {
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
            MeetupSignupRepositoryError::connection("database connection error")
        }
        _ => MeetupSignupRepositoryError::query("database error"),
    }
}

fn row_to_signup(row: MeetupSignupRow) -> MeetupSignup {
    MeetupSignup {
        learner_id: LearnerId::from_uuid(row.learner_id),
        meetup_id: MeetupId::from_uuid(row.meetup_id),
        created_at: row.created_at,
    }
}

#[async_trait]
impl MeetupSignupRepository for DieselMeetupSignupRepository {
    async fn save(&self, signup: &MeetupSignup) -> Result<(), MeetupSignupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewMeetupSignupRow {
            learner_id: *signup.learner_id.as_uuid(),
            meetup_id: *signup.meetup_id.as_uuid(),
            created_at: signup.created_at,
        };

        diesel::insert_into(meetup_signups::table)
            .values(&new_row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn list_for_learner(
        &self,
        learner_id: &LearnerId,
    ) -> Result<Vec<MeetupSignup>, MeetupSignupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MeetupSignupRow> = meetup_signups::table
            .filter(meetup_signups::learner_id.eq(learner_id.as_uuid()))
            .order_by(meetup_signups::created_at)
            .select(MeetupSignupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_signup).collect())
    }
}
