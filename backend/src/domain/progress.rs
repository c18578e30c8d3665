//! Progress record and snapshot for per-learner course completion.
//!
//! A [`ProgressRecord`] exists per (learner, course) pair, created lazily on
//! the first access or completion call. The completed set never shrinks and
//! membership is idempotent; `last_accessed_lesson` tracks the most recent
//! access or completion, whichever happened later in real time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, LearnerId, LessonId};

/// Durable completion state for one (learner, course) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// The owning learner.
    pub learner_id: LearnerId,
    /// The course being tracked.
    pub course_id: CourseId,
    /// Completed lesson ids; unique, unordered, never shrinking.
    pub completed_lessons: Vec<LessonId>,
    /// The lesson most recently accessed or completed.
    pub last_accessed_lesson: Option<LessonId>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
}

/// Read model combining the completed set with the course-wide denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Completed lesson ids.
    pub completed_lessons: Vec<LessonId>,
    /// The lesson most recently accessed or completed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_lesson: Option<LessonId>,
    /// Share of the course completed, rounded half-up to a whole percent.
    pub percentage: u8,
}

impl ProgressSnapshot {
    /// The zero state returned before any access or completion call.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            completed_lessons: Vec::new(),
            last_accessed_lesson: None,
            percentage: 0,
        }
    }
}

/// Completion percentage with round-half-up semantics.
///
/// 2 of 3 lessons is 66.67%, which rounds to 67, not 66. A course with no
/// lessons reports 0; a completed count above the total clamps to 100 rather
/// than overflowing (the catalog can lag behind a just-deleted lesson).
///
/// # Examples
/// ```
/// use studyhall_backend::domain::completion_percentage;
///
/// assert_eq!(completion_percentage(2, 3), 67);
/// assert_eq!(completion_percentage(1, 3), 33);
/// assert_eq!(completion_percentage(0, 5), 0);
/// ```
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // (100c + t/2) / t rounds half up; scaling by two keeps it integral.
    let numerator = completed.saturating_mul(200).saturating_add(total);
    let denominator = total.saturating_mul(2);
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "truncating division of the scaled numerator implements round-half-up"
    )]
    let percent = numerator / denominator;
    u8::try_from(percent.min(100)).unwrap_or(100)
}
