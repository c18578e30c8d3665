//! Weekly recurrence primitives.
//!
//! A [`Schedule`] describes a weekly slot (day of week, start time, IANA
//! timezone). [`next_occurrence`] computes the next start strictly after a
//! supplied instant, and [`is_currently_live`] reports whether that instant
//! falls inside the slot's live window.
//!
//! Every function takes `now` as an explicit parameter. Nothing in this crate
//! reads the system clock, so callers control time in tests and the results
//! are deterministic.
//!
//! # Examples
//! ```
//! use chrono::{TimeZone, Utc, Weekday};
//! use recurrence::{next_occurrence, Schedule};
//!
//! let schedule = Schedule::new(Weekday::Tue, 18, 0, chrono_tz::Europe::London)
//!     .expect("valid schedule");
//! let now = Utc
//!     .with_ymd_and_hms(2026, 3, 28, 12, 0, 0)
//!     .single()
//!     .expect("valid instant");
//!
//! // The following Tuesday falls after the spring DST change, so the wall
//! // clock stays at 18:00 while the offset moves to BST.
//! let next = next_occurrence(&schedule, now);
//! assert_eq!(next.to_rfc3339(), "2026-03-31T18:00:00+01:00");
//! ```

pub mod occurrence;
pub mod schedule;

pub use occurrence::{is_currently_live, next_occurrence};
pub use schedule::{Schedule, ScheduleError};
