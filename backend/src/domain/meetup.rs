//! Recurring community meetup configuration and signup records.
//!
//! Meetups are static configuration loaded from a JSON fixture file at
//! startup, not learner data. Each entry pairs a weekly [`Schedule`] with
//! host metadata and a live-window duration. Signups are (learner, meetup)
//! pairs stored durably; they never influence occurrence computation.

use std::path::Path;

use chrono::{DateTime, Utc};
use recurrence::Schedule;
use serde::Deserialize;

use crate::domain::{LearnerId, MeetupId};

/// A weekly recurring meetup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct RecurringMeetup {
    /// Stable identifier referenced by signup requests.
    pub id: MeetupId,
    /// Display title.
    pub title: String,
    /// Host name shown in listings.
    pub host: String,
    /// Contact address for attendees.
    pub contact: String,
    /// Weekly slot in the meetup's own timezone.
    pub schedule: Schedule,
    /// Length of the live window in minutes.
    pub duration_minutes: u32,
}

/// A learner's registration interest for one meetup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetupSignup {
    /// The registering learner.
    pub learner_id: LearnerId,
    /// The meetup signed up for.
    pub meetup_id: MeetupId,
    /// When the signup was first recorded.
    pub created_at: DateTime<Utc>,
}

/// Errors raised while loading the meetup fixture file.
#[derive(Debug, thiserror::Error)]
pub enum MeetupFixtureError {
    /// The fixture file could not be read.
    #[error("failed to read meetup fixture {path}: {source}")]
    Io {
        /// The fixture path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The fixture content is not valid JSON or fails schedule validation.
    #[error("failed to parse meetup fixture {path}: {source}")]
    Parse {
        /// The fixture path.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A meetup declares a zero-length live window.
    #[error("meetup {id} has a zero duration")]
    ZeroDuration {
        /// The offending meetup id.
        id: MeetupId,
    },
}

impl RecurringMeetup {
    /// Load and validate the meetup roster from a JSON fixture file.
    ///
    /// Invalid schedules (bad weekday, out-of-range time, unknown timezone)
    /// are rejected here, at startup, so request handlers never see them.
    ///
    /// # Errors
    /// Returns [`MeetupFixtureError`] when the file is unreadable, the JSON
    /// is malformed, a schedule fails validation, or a duration is zero.
    pub fn load_fixture(path: &Path) -> Result<Vec<Self>, MeetupFixtureError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| MeetupFixtureError::Io {
            path: display.clone(),
            source,
        })?;
        let meetups: Vec<Self> =
            serde_json::from_str(&raw).map_err(|source| MeetupFixtureError::Parse {
                path: display,
                source,
            })?;
        for meetup in &meetups {
            if meetup.duration_minutes == 0 {
                return Err(MeetupFixtureError::ZeroDuration {
                    id: meetup.id.clone(),
                });
            }
        }
        Ok(meetups)
    }
}

// ScheduleError surfaces through serde_json::Error during deserialisation;
// the re-export keeps call sites from depending on the recurrence crate.
pub use recurrence::ScheduleError as MeetupScheduleError;
