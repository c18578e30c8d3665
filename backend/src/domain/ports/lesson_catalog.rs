//! Port abstraction for the lesson catalog.
//!
//! The catalog answers three questions: how many lessons a course has (the
//! percentage denominator), whether a lesson belongs to a course, and which
//! content-delivery object key serves a lesson's video. Lesson counts must
//! not be cached across calls; a course's roster can grow.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CourseId, LessonId};

/// Errors raised by lesson catalog adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LessonCatalogError {
    /// The catalog backend could not be reached.
    #[error("lesson catalog unavailable: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// The referenced course is unknown.
    #[error("unknown course: {course_id}")]
    UnknownCourse {
        /// The missing course id.
        course_id: String,
    },
}

impl LessonCatalogError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create an unknown-course error for the given id.
    pub fn unknown_course(course_id: impl Into<String>) -> Self {
        Self::UnknownCourse {
            course_id: course_id.into(),
        }
    }
}

/// One lesson in a course outline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonEntry {
    /// The lesson identifier.
    pub id: LessonId,
    /// Object key of the lesson's video at the content-delivery edge.
    pub media_key: String,
}

/// A course's lesson roster, as loaded from the catalog fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    /// The course identifier.
    pub id: CourseId,
    /// Path prefix shared by all of the course's media objects.
    pub media_prefix: String,
    /// Ordered lesson roster.
    pub lessons: Vec<LessonEntry>,
}

/// Port for course and lesson metadata lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonCatalog: Send + Sync {
    /// Total lessons in the course; the percentage denominator.
    async fn count_lessons(&self, course_id: &CourseId) -> Result<usize, LessonCatalogError>;

    /// Whether `lesson_id` belongs to `course_id`.
    async fn lesson_exists(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<bool, LessonCatalogError>;

    /// Resolve a lesson to its content-delivery object key, or `None` when
    /// the lesson is not part of the course.
    async fn media_key(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<String>, LessonCatalogError>;

    /// Path prefix covering every media object of the course, used for the
    /// wildcard scope of a course pass.
    async fn media_prefix(&self, course_id: &CourseId) -> Result<String, LessonCatalogError>;
}
