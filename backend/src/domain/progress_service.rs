//! Progress tracking domain service.
//!
//! Implements the [`ProgressTracking`] driving port over the atomic
//! primitives of [`ProgressRepository`]. The service itself never holds
//! mutable progress state; every mutation is delegated to the store's
//! single-step operations, so concurrent completion calls cannot lose
//! updates regardless of how many service instances run.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    LessonCatalog, LessonCatalogError, ProgressRepository, ProgressRepositoryError,
    ProgressTracking,
};
use crate::domain::{
    completion_percentage, CourseId, Error, LearnerId, LessonId, ProgressRecord, ProgressSnapshot,
};

fn map_repository_error(error: ProgressRepositoryError) -> Error {
    match error {
        ProgressRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("progress store unavailable: {message}"))
        }
        ProgressRepositoryError::Query { message } => {
            Error::internal(format!("progress store error: {message}"))
        }
    }
}

fn map_catalog_error(error: LessonCatalogError) -> Error {
    match error {
        LessonCatalogError::Connection { message } => {
            Error::service_unavailable(format!("lesson catalog unavailable: {message}"))
        }
        LessonCatalogError::UnknownCourse { course_id } => {
            Error::not_found(format!("course {course_id} not found"))
        }
    }
}

/// Progress service over a repository, the lesson catalog, and a clock.
#[derive(Clone)]
pub struct ProgressService<R, C> {
    progress_repo: Arc<R>,
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, C> ProgressService<R, C>
where
    R: ProgressRepository,
    C: LessonCatalog,
{
    /// Create a new service with its repository, catalog, and clock.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use studyhall_backend::domain::ProgressService;
    /// # use studyhall_backend::outbound::persistence::MemoryProgressRepository;
    /// # use studyhall_backend::outbound::persistence::FixtureLessonCatalog;
    /// let service = ProgressService::new(
    ///     Arc::new(MemoryProgressRepository::default()),
    ///     Arc::new(FixtureLessonCatalog::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    pub fn new(progress_repo: Arc<R>, catalog: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            progress_repo,
            catalog,
            clock,
        }
    }

    /// Validate the lesson belongs to the course; unknown lessons surface
    /// as `NotFound` before any store write happens.
    async fn require_lesson(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<(), Error> {
        let exists = self
            .catalog
            .lesson_exists(course_id, lesson_id)
            .await
            .map_err(map_catalog_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "lesson {lesson_id} not found in course {course_id}"
            )))
        }
    }

    /// Combine a record with the current lesson count into a snapshot.
    ///
    /// The count is looked up once per computation and never cached beyond
    /// it; a course's roster can grow between requests.
    async fn snapshot_from(
        &self,
        course_id: &CourseId,
        record: ProgressRecord,
    ) -> Result<ProgressSnapshot, Error> {
        let total = self
            .catalog
            .count_lessons(course_id)
            .await
            .map_err(map_catalog_error)?;
        let percentage = completion_percentage(record.completed_lessons.len(), total);
        Ok(ProgressSnapshot {
            completed_lessons: record.completed_lessons,
            last_accessed_lesson: record.last_accessed_lesson,
            percentage,
        })
    }
}

#[async_trait]
impl<R, C> ProgressTracking for ProgressService<R, C>
where
    R: ProgressRepository,
    C: LessonCatalog,
{
    async fn record_access(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<(), Error> {
        self.require_lesson(course_id, lesson_id).await?;
        self.progress_repo
            .touch_access(learner_id, course_id, lesson_id, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn record_completion(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<ProgressSnapshot, Error> {
        self.require_lesson(course_id, lesson_id).await?;
        let record = self
            .progress_repo
            .append_completion(learner_id, course_id, lesson_id, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        debug!(
            learner_id = %learner_id,
            course_id = %course_id,
            lesson_id = %lesson_id,
            completed = record.completed_lessons.len(),
            "lesson completion recorded"
        );
        self.snapshot_from(course_id, record).await
    }

    async fn get_snapshot(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<ProgressSnapshot, Error> {
        let record = self
            .progress_repo
            .fetch(learner_id, course_id)
            .await
            .map_err(map_repository_error)?;
        match record {
            Some(found) => self.snapshot_from(course_id, found).await,
            None => Ok(ProgressSnapshot::empty()),
        }
    }
}

#[cfg(test)]
#[path = "progress_service_tests.rs"]
mod tests;
