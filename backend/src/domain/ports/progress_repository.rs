//! Port abstraction for progress persistence.
//!
//! The port deliberately exposes no "load record / store record" pair.
//! Mutations are atomic primitives ([`ProgressRepository::append_completion`]
//! and [`ProgressRepository::touch_access`]), so a read-modify-write
//! implementation of completion tracking is unrepresentable at the service
//! layer and concurrent completions cannot lose updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CourseId, LearnerId, LessonId, ProgressRecord};

/// Errors raised by progress repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressRepositoryError {
    /// Store connection could not be established or timed out.
    #[error("progress store connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("progress store query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl ProgressRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for per-learner course progress storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Atomically add `lesson_id` to the completed set, update
    /// `last_accessed_lesson`, and bump the timestamp, creating the record
    /// when absent. Adding an already-present lesson is a no-op for the set.
    ///
    /// Returns the post-append record so callers never re-read under a
    /// separate transaction.
    async fn append_completion(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<ProgressRecord, ProgressRepositoryError>;

    /// Upsert the record setting `last_accessed_lesson` and the timestamp
    /// without touching the completed set.
    async fn touch_access(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<(), ProgressRepositoryError>;

    /// Point read by the (learner, course) composite key.
    async fn fetch(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError>;
}
