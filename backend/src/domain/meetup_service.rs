//! Community meetup domain service.
//!
//! Serves the meetup listing from the in-memory roster loaded at startup and
//! records signup interest through the signup repository. Occurrence state is
//! computed fresh against the supplied instant on every listing call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use recurrence::{is_currently_live, next_occurrence};
use tracing::debug;

use crate::domain::ports::{
    MeetupSignupRepository, MeetupSignupRepositoryError, Meetups, UpcomingMeetup,
};
use crate::domain::{Error, LearnerId, MeetupId, MeetupSignup, RecurringMeetup};

fn map_repository_error(error: MeetupSignupRepositoryError) -> Error {
    match error {
        MeetupSignupRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("meetup signup store unavailable: {message}"))
        }
        MeetupSignupRepositoryError::Query { message } => {
            Error::internal(format!("meetup signup store error: {message}"))
        }
    }
}

/// Meetup service over a static roster and a signup repository.
#[derive(Clone)]
pub struct MeetupService<R> {
    roster: Arc<Vec<RecurringMeetup>>,
    signups: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MeetupService<R>
where
    R: MeetupSignupRepository,
{
    /// Create a service for the given roster, repository, and clock.
    pub fn new(roster: Vec<RecurringMeetup>, signups: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            roster: Arc::new(roster),
            signups,
            clock,
        }
    }

    fn find_meetup(&self, meetup_id: &MeetupId) -> Result<&RecurringMeetup, Error> {
        self.roster
            .iter()
            .find(|meetup| meetup.id == *meetup_id)
            .ok_or_else(|| Error::not_found(format!("meetup {meetup_id} not found")))
    }
}

#[async_trait]
impl<R> Meetups for MeetupService<R>
where
    R: MeetupSignupRepository,
{
    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<UpcomingMeetup>, Error> {
        let listing = self
            .roster
            .iter()
            .map(|meetup| UpcomingMeetup {
                id: meetup.id.clone(),
                title: meetup.title.clone(),
                host: meetup.host.clone(),
                contact: meetup.contact.clone(),
                next_occurrence: next_occurrence(&meetup.schedule, now).to_rfc3339(),
                is_live: is_currently_live(&meetup.schedule, meetup.duration_minutes, now),
                duration_minutes: meetup.duration_minutes,
            })
            .collect();
        Ok(listing)
    }

    async fn signup(&self, learner_id: &LearnerId, meetup_id: &MeetupId) -> Result<(), Error> {
        let meetup = self.find_meetup(meetup_id)?;
        let signup = MeetupSignup {
            learner_id: learner_id.clone(),
            meetup_id: meetup.id.clone(),
            created_at: self.clock.utc(),
        };
        self.signups
            .save(&signup)
            .await
            .map_err(map_repository_error)?;
        debug!(
            learner_id = %learner_id,
            meetup_id = %meetup_id,
            "meetup signup recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "meetup_service_tests.rs"]
mod tests;
