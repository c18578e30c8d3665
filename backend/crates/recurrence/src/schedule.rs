//! Validated weekly schedule definitions.
//!
//! A schedule is constructed through [`Schedule::new`] or deserialised from a
//! camelCase payload; both paths reject out-of-range times and unknown
//! timezones, so downstream recurrence maths never sees an invalid slot.

use chrono::{NaiveTime, Timelike, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

/// Validation errors raised while constructing a [`Schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The day-of-week string did not name a weekday.
    #[error("unrecognised day of week: {value}")]
    InvalidDayOfWeek {
        /// The rejected input.
        value: String,
    },
    /// The start hour is outside `0..=23`.
    #[error("start hour {hour} is outside 0..=23")]
    HourOutOfRange {
        /// The rejected hour.
        hour: u8,
    },
    /// The start minute is outside `0..=59`.
    #[error("start minute {minute} is outside 0..=59")]
    MinuteOutOfRange {
        /// The rejected minute.
        minute: u8,
    },
    /// The timezone string is not a known IANA identifier.
    #[error("unknown IANA timezone: {value}")]
    UnknownTimezone {
        /// The rejected input.
        value: String,
    },
}

/// A weekly slot: day of week plus wall-clock start time in an IANA timezone.
///
/// # Examples
/// ```
/// use chrono::Weekday;
/// use recurrence::Schedule;
///
/// let schedule = Schedule::new(Weekday::Wed, 9, 30, chrono_tz::America::New_York)
///     .expect("valid schedule");
/// assert_eq!(schedule.hour(), 9);
/// assert_eq!(schedule.minute(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ScheduleDto")]
pub struct Schedule {
    day_of_week: Weekday,
    start_time: NaiveTime,
    timezone: Tz,
}

impl Schedule {
    /// Construct a schedule, validating the start time.
    ///
    /// # Errors
    /// Returns [`ScheduleError::HourOutOfRange`] or
    /// [`ScheduleError::MinuteOutOfRange`] when the start time is not a valid
    /// wall-clock time.
    pub fn new(
        day_of_week: Weekday,
        hour: u8,
        minute: u8,
        timezone: Tz,
    ) -> Result<Self, ScheduleError> {
        if hour > 23 {
            return Err(ScheduleError::HourOutOfRange { hour });
        }
        if minute > 59 {
            return Err(ScheduleError::MinuteOutOfRange { minute });
        }
        let start_time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)
            .ok_or(ScheduleError::HourOutOfRange { hour })?;
        Ok(Self {
            day_of_week,
            start_time,
            timezone,
        })
    }

    /// The scheduled day of week.
    #[must_use]
    pub const fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    /// The wall-clock start time in the schedule's timezone.
    #[must_use]
    pub const fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// The scheduled start hour (`0..=23`).
    #[must_use]
    pub fn hour(&self) -> u8 {
        u8::try_from(self.start_time.hour()).unwrap_or_default()
    }

    /// The scheduled start minute (`0..=59`).
    #[must_use]
    pub fn minute(&self) -> u8 {
        u8::try_from(self.start_time.minute()).unwrap_or_default()
    }

    /// The schedule's IANA timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// Raw deserialisation payload validated into a [`Schedule`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct ScheduleDto {
    day_of_week: String,
    hour: u8,
    minute: u8,
    timezone: String,
}

impl TryFrom<ScheduleDto> for Schedule {
    type Error = ScheduleError;

    fn try_from(dto: ScheduleDto) -> Result<Self, Self::Error> {
        let ScheduleDto {
            day_of_week,
            hour,
            minute,
            timezone,
        } = dto;

        let day = day_of_week
            .parse::<Weekday>()
            .map_err(|_| ScheduleError::InvalidDayOfWeek { value: day_of_week })?;
        let tz = timezone
            .parse::<Tz>()
            .map_err(|_| ScheduleError::UnknownTimezone { value: timezone })?;
        Self::new(day, hour, minute, tz)
    }
}
