//! Next-occurrence and live-window computations for weekly schedules.
//!
//! All functions are pure: the reference instant arrives as a parameter and
//! results are derived solely from it and the schedule. Local times that fall
//! into a daylight-saving gap roll forward to the first valid wall-clock
//! time; ambiguous local times resolve to the earlier offset.

use chrono::{DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::schedule::Schedule;

/// Upper bound on gap-resolution steps. Real-world DST gaps are at most two
/// hours; each step advances thirty minutes.
const MAX_GAP_STEPS: u8 = 5;

/// Resolve a local wall-clock time to an instant in `tz`.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = local;
    for _ in 0..MAX_GAP_STEPS {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(resolved) => return resolved,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => {
                candidate = candidate
                    .checked_add_signed(chrono::Duration::minutes(30))
                    .unwrap_or(candidate);
            }
        }
    }
    // Total fallback for instants outside any plausible DST gap.
    tz.from_utc_datetime(&local)
}

/// The scheduled start on the given local date.
fn start_on(schedule: &Schedule, date: NaiveDate) -> DateTime<Tz> {
    resolve_local(schedule.timezone(), date.and_time(schedule.start_time()))
}

/// Days from `from` forward to the next `target` weekday, counting today as
/// zero when the weekdays already match.
fn days_until(from: chrono::Weekday, target: chrono::Weekday) -> u64 {
    let delta = i64::from(target.num_days_from_monday())
        - i64::from(from.num_days_from_monday());
    u64::try_from(delta.rem_euclid(7)).unwrap_or_default()
}

/// Compute the next occurrence of `schedule` strictly after `now`.
///
/// The candidate slot in the current week is used when it is still in the
/// future; otherwise the occurrence advances by seven calendar days in the
/// schedule's timezone, preserving the wall-clock start across
/// daylight-saving transitions.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc, Weekday};
/// use recurrence::{next_occurrence, Schedule};
///
/// let schedule = Schedule::new(Weekday::Fri, 12, 0, chrono_tz::UTC).expect("valid schedule");
/// let now = Utc
///     .with_ymd_and_hms(2026, 8, 21, 12, 0, 0)
///     .single()
///     .expect("valid instant");
///
/// // Friday noon exactly: the slot has started, so the next one is a week out.
/// let next = next_occurrence(&schedule, now);
/// assert_eq!(next.to_rfc3339(), "2026-08-28T12:00:00+00:00");
/// ```
#[must_use]
pub fn next_occurrence(schedule: &Schedule, now: DateTime<Utc>) -> DateTime<Tz> {
    let local_now = now.with_timezone(&schedule.timezone());
    let offset = Days::new(days_until(local_now.weekday(), schedule.day_of_week()));
    let candidate_date = local_now
        .date_naive()
        .checked_add_days(offset)
        .unwrap_or_else(|| local_now.date_naive());

    let candidate = start_on(schedule, candidate_date);
    if candidate.with_timezone(&Utc) > now {
        return candidate;
    }

    let next_date = candidate_date
        .checked_add_days(Days::new(7))
        .unwrap_or(candidate_date);
    start_on(schedule, next_date)
}

/// Report whether `now` falls inside the schedule's live window.
///
/// The window opens at the scheduled start on the scheduled day and closes
/// `duration_minutes` later; the start is inclusive and the end exclusive. A
/// zero-length duration yields an empty window.
#[must_use]
pub fn is_currently_live(schedule: &Schedule, duration_minutes: u32, now: DateTime<Utc>) -> bool {
    let local_now = now.with_timezone(&schedule.timezone());
    if local_now.weekday() != schedule.day_of_week() {
        return false;
    }

    let start = start_on(schedule, local_now.date_naive()).with_timezone(&Utc);
    let Some(end) = start.checked_add_signed(chrono::Duration::minutes(i64::from(
        duration_minutes,
    ))) else {
        return false;
    };
    now >= start && now < end
}

#[cfg(test)]
mod tests {
    //! Case tables for occurrence maths, including DST transitions.

    use chrono::Weekday;
    use rstest::{fixture, rstest};

    use super::*;

    fn instant(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("test instants are valid RFC 3339")
            .with_timezone(&Utc)
    }

    #[fixture]
    fn london_tuesday() -> Schedule {
        Schedule::new(Weekday::Tue, 18, 0, chrono_tz::Europe::London).expect("valid schedule")
    }

    #[rstest]
    // Saturday before the slot: the coming Tuesday wins.
    #[case("2026-08-15T09:00:00+00:00", "2026-08-18T18:00:00+01:00")]
    // Tuesday morning, slot later the same day.
    #[case("2026-08-18T08:00:00+00:00", "2026-08-18T18:00:00+01:00")]
    // One second after the start: next week.
    #[case("2026-08-18T17:00:01+00:00", "2026-08-25T18:00:00+01:00")]
    // Exactly at the start: strictly-after means next week.
    #[case("2026-08-18T17:00:00+00:00", "2026-08-25T18:00:00+01:00")]
    fn next_occurrence_is_strictly_after_now(
        london_tuesday: Schedule,
        #[case] now: &str,
        #[case] expected: &str,
    ) {
        let next = next_occurrence(&london_tuesday, instant(now));
        assert_eq!(next.to_rfc3339(), expected);
        assert!(next.with_timezone(&Utc) > instant(now));
        assert_eq!(next.weekday(), Weekday::Tue);
    }

    #[rstest]
    fn next_occurrence_preserves_wall_clock_across_spring_forward(london_tuesday: Schedule) {
        // London enters BST on 2026-03-29, between these two Tuesdays.
        let before = next_occurrence(&london_tuesday, instant("2026-03-23T12:00:00+00:00"));
        assert_eq!(before.to_rfc3339(), "2026-03-24T18:00:00+00:00");

        let after = next_occurrence(&london_tuesday, instant("2026-03-28T12:00:00+00:00"));
        assert_eq!(after.to_rfc3339(), "2026-03-31T18:00:00+01:00");

        // Calendar advance, not a fixed 168 h: the instants are 167 h apart.
        let gap = after.with_timezone(&Utc) - before.with_timezone(&Utc);
        assert_eq!(gap, chrono::Duration::hours(167));
    }

    #[rstest]
    fn next_occurrence_preserves_wall_clock_across_fall_back(london_tuesday: Schedule) {
        // London leaves BST on 2026-10-25.
        let next = next_occurrence(&london_tuesday, instant("2026-10-24T12:00:00+00:00"));
        assert_eq!(next.to_rfc3339(), "2026-10-27T18:00:00+00:00");
    }

    #[rstest]
    fn gap_start_time_rolls_forward_to_first_valid_time() {
        // 02:30 does not exist in New York on 2026-03-08; clocks jump 02:00 -> 03:00.
        let schedule = Schedule::new(Weekday::Sun, 2, 30, chrono_tz::America::New_York)
            .expect("valid schedule");
        let next = next_occurrence(&schedule, instant("2026-03-08T01:00:00-05:00"));
        assert_eq!(next.to_rfc3339(), "2026-03-08T03:00:00-04:00");
    }

    #[rstest]
    fn ambiguous_start_time_resolves_to_earlier_offset() {
        // 01:30 occurs twice in New York on 2026-11-01; the EDT reading wins.
        let schedule = Schedule::new(Weekday::Sun, 1, 30, chrono_tz::America::New_York)
            .expect("valid schedule");
        let next = next_occurrence(&schedule, instant("2026-11-01T00:00:00-04:00"));
        assert_eq!(next.to_rfc3339(), "2026-11-01T01:30:00-04:00");
    }

    #[fixture]
    fn utc_friday_noon() -> Schedule {
        Schedule::new(Weekday::Fri, 12, 0, chrono_tz::UTC).expect("valid schedule")
    }

    #[rstest]
    // One second before the window opens.
    #[case("2026-08-21T11:59:59+00:00", false)]
    // Start is inclusive.
    #[case("2026-08-21T12:00:00+00:00", true)]
    // Deep inside the window.
    #[case("2026-08-21T12:59:59+00:00", true)]
    // End is exclusive.
    #[case("2026-08-21T13:00:00+00:00", false)]
    // Same time on the wrong day.
    #[case("2026-08-20T12:30:00+00:00", false)]
    fn live_window_is_start_inclusive_end_exclusive(
        utc_friday_noon: Schedule,
        #[case] now: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            is_currently_live(&utc_friday_noon, 60, instant(now)),
            expected
        );
    }

    #[rstest]
    fn live_window_respects_schedule_timezone() {
        // 18:00 Tuesday in London is 17:00 UTC during BST.
        let schedule = Schedule::new(Weekday::Tue, 18, 0, chrono_tz::Europe::London)
            .expect("valid schedule");
        assert!(is_currently_live(
            &schedule,
            90,
            instant("2026-08-18T17:45:00+00:00")
        ));
        assert!(!is_currently_live(
            &schedule,
            90,
            instant("2026-08-18T18:30:00+00:00")
        ));
    }

    #[rstest]
    fn zero_duration_never_reports_live(utc_friday_noon: Schedule) {
        assert!(!is_currently_live(
            &utc_friday_noon,
            0,
            instant("2026-08-21T12:00:00+00:00")
        ));
    }

    #[rstest]
    #[case(Weekday::Mon, Weekday::Mon, 0)]
    #[case(Weekday::Mon, Weekday::Sun, 6)]
    #[case(Weekday::Sat, Weekday::Tue, 3)]
    fn days_until_counts_forward(#[case] from: Weekday, #[case] target: Weekday, #[case] expected: u64) {
        assert_eq!(days_until(from, target), expected);
    }
}
