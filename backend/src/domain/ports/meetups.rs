//! Driving port for the community meetup surface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, LearnerId, MeetupId};

/// One meetup listing entry with its computed occurrence state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingMeetup {
    /// Stable identifier for signup calls.
    pub id: MeetupId,
    /// Display title.
    pub title: String,
    /// Host name.
    pub host: String,
    /// Contact address.
    pub contact: String,
    /// Next start strictly after the listing instant, RFC 3339 with the
    /// schedule-timezone offset.
    pub next_occurrence: String,
    /// Whether the listing instant falls inside the live window.
    pub is_live: bool,
    /// Length of the live window in minutes.
    pub duration_minutes: u32,
}

/// Driving port for meetup listing and signup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Meetups: Send + Sync {
    /// List all configured meetups with next occurrence and live status
    /// computed at `now`.
    async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<UpcomingMeetup>, Error>;

    /// Record a learner's signup interest; idempotent on repeat signup.
    ///
    /// # Errors
    /// `NotFound` when no configured meetup carries `meetup_id`.
    async fn signup(&self, learner_id: &LearnerId, meetup_id: &MeetupId) -> Result<(), Error>;
}
