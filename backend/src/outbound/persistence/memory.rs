//! In-memory adapters for fixture mode, development, and tests.
//!
//! These adapters back the server when no database URL is configured. They
//! honour the same semantics as the Diesel adapters: completion appends are
//! atomic and idempotent, repeat signups keep the original timestamp, and
//! the catalog answers from a JSON-loaded course roster.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CourseOutline, EnrollmentRepository, EnrollmentRepositoryError, LessonCatalog,
    LessonCatalogError, MeetupSignupRepository, MeetupSignupRepositoryError, ProgressRepository,
    ProgressRepositoryError,
};
use crate::domain::{CourseId, Enrollment, LearnerId, LessonId, MeetupSignup, ProgressRecord};

fn poisoned<E>(make: impl FnOnce(String) -> E) -> E {
    make("in-memory store lock poisoned".to_owned())
}

/// In-memory enrollment store keyed by (learner, course).
#[derive(Default)]
pub struct MemoryEnrollmentRepository {
    rows: Mutex<HashMap<(LearnerId, CourseId), Enrollment>>,
}

impl MemoryEnrollmentRepository {
    /// Build a store pre-populated with the given enrollments. Later
    /// duplicates of a (learner, course) pair are ignored, matching the
    /// insert-once semantics of `save`.
    #[must_use]
    pub fn seeded(enrollments: Vec<Enrollment>) -> Self {
        let mut rows = HashMap::new();
        for enrollment in enrollments {
            let key = (enrollment.learner_id.clone(), enrollment.course_id.clone());
            rows.entry(key).or_insert(enrollment);
        }
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryEnrollmentRepository {
    async fn find(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentRepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| poisoned(EnrollmentRepositoryError::connection))?;
        Ok(rows
            .get(&(learner_id.clone(), course_id.clone()))
            .cloned())
    }

    async fn save(&self, enrollment: &Enrollment) -> Result<(), EnrollmentRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| poisoned(EnrollmentRepositoryError::connection))?;
        let key = (enrollment.learner_id.clone(), enrollment.course_id.clone());
        rows.entry(key).or_insert_with(|| enrollment.clone());
        Ok(())
    }
}

/// In-memory progress store keyed by (learner, course).
///
/// A single mutex guards each append end to end, so the returned record is
/// exactly the post-append state even under concurrent completions.
#[derive(Default)]
pub struct MemoryProgressRepository {
    records: Mutex<HashMap<(LearnerId, CourseId), ProgressRecord>>,
}

impl MemoryProgressRepository {
    fn with_record<T>(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        apply: impl FnOnce(&mut ProgressRecord) -> T,
        at: DateTime<Utc>,
    ) -> Result<T, ProgressRepositoryError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| poisoned(ProgressRepositoryError::connection))?;
        let record = records
            .entry((learner_id.clone(), course_id.clone()))
            .or_insert_with(|| ProgressRecord {
                learner_id: learner_id.clone(),
                course_id: course_id.clone(),
                completed_lessons: Vec::new(),
                last_accessed_lesson: None,
                updated_at: at,
            });
        Ok(apply(record))
    }
}

#[async_trait]
impl ProgressRepository for MemoryProgressRepository {
    async fn append_completion(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<ProgressRecord, ProgressRepositoryError> {
        self.with_record(
            learner_id,
            course_id,
            |record| {
                if !record.completed_lessons.contains(lesson_id) {
                    record.completed_lessons.push(lesson_id.clone());
                }
                record.last_accessed_lesson = Some(lesson_id.clone());
                record.updated_at = at;
                record.clone()
            },
            at,
        )
    }

    async fn touch_access(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        at: DateTime<Utc>,
    ) -> Result<(), ProgressRepositoryError> {
        self.with_record(
            learner_id,
            course_id,
            |record| {
                record.last_accessed_lesson = Some(lesson_id.clone());
                record.updated_at = at;
            },
            at,
        )
    }

    async fn fetch(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<ProgressRecord>, ProgressRepositoryError> {
        let records = self
            .records
            .lock()
            .map_err(|_| poisoned(ProgressRepositoryError::connection))?;
        Ok(records
            .get(&(learner_id.clone(), course_id.clone()))
            .cloned())
    }
}

/// Lesson catalog answering from a fixed set of course outlines.
#[derive(Default)]
pub struct FixtureLessonCatalog {
    courses: HashMap<CourseId, CourseOutline>,
}

impl FixtureLessonCatalog {
    /// Build a catalog from the given outlines.
    #[must_use]
    pub fn new(outlines: Vec<CourseOutline>) -> Self {
        let courses = outlines
            .into_iter()
            .map(|outline| (outline.id.clone(), outline))
            .collect();
        Self { courses }
    }

    /// Load a catalog from a JSON fixture file holding an array of course
    /// outlines.
    ///
    /// # Errors
    /// Returns a connection error when the file is unreadable or the JSON
    /// does not parse.
    pub fn load_fixture(path: &Path) -> Result<Self, LessonCatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            LessonCatalogError::connection(format!(
                "failed to read course fixture {}: {err}",
                path.display()
            ))
        })?;
        let outlines: Vec<CourseOutline> = serde_json::from_str(&raw).map_err(|err| {
            LessonCatalogError::connection(format!(
                "failed to parse course fixture {}: {err}",
                path.display()
            ))
        })?;
        Ok(Self::new(outlines))
    }

    fn outline(&self, course_id: &CourseId) -> Result<&CourseOutline, LessonCatalogError> {
        self.courses
            .get(course_id)
            .ok_or_else(|| LessonCatalogError::unknown_course(course_id.to_string()))
    }
}

#[async_trait]
impl LessonCatalog for FixtureLessonCatalog {
    async fn count_lessons(&self, course_id: &CourseId) -> Result<usize, LessonCatalogError> {
        Ok(self.outline(course_id)?.lessons.len())
    }

    async fn lesson_exists(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<bool, LessonCatalogError> {
        let outline = self.outline(course_id)?;
        Ok(outline.lessons.iter().any(|lesson| lesson.id == *lesson_id))
    }

    async fn media_key(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<String>, LessonCatalogError> {
        let outline = self.outline(course_id)?;
        Ok(outline
            .lessons
            .iter()
            .find(|lesson| lesson.id == *lesson_id)
            .map(|lesson| lesson.media_key.clone()))
    }

    async fn media_prefix(&self, course_id: &CourseId) -> Result<String, LessonCatalogError> {
        Ok(self.outline(course_id)?.media_prefix.clone())
    }
}

/// In-memory meetup signup store.
#[derive(Default)]
pub struct MemoryMeetupSignupRepository {
    signups: Mutex<Vec<MeetupSignup>>,
}

#[async_trait]
impl MeetupSignupRepository for MemoryMeetupSignupRepository {
    async fn save(&self, signup: &MeetupSignup) -> Result<(), MeetupSignupRepositoryError> {
        let mut signups = self
            .signups
            .lock()
            .map_err(|_| poisoned(MeetupSignupRepositoryError::connection))?;
        let exists = signups.iter().any(|existing| {
            existing.learner_id == signup.learner_id && existing.meetup_id == signup.meetup_id
        });
        if !exists {
            signups.push(signup.clone());
        }
        Ok(())
    }

    async fn list_for_learner(
        &self,
        learner_id: &LearnerId,
    ) -> Result<Vec<MeetupSignup>, MeetupSignupRepositoryError> {
        let signups = self
            .signups
            .lock()
            .map_err(|_| poisoned(MeetupSignupRepositoryError::connection))?;
        Ok(signups
            .iter()
            .filter(|signup| signup.learner_id == *learner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Set-semantics and fixture-loading coverage for the in-memory adapters.

    use std::io::Write;

    use chrono::TimeZone;
    use rstest::rstest;

    use crate::domain::{EnrollmentKind, MeetupId, PaymentStatus};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid instant")
    }

    #[tokio::test]
    async fn append_completion_is_idempotent_per_lesson() {
        let repo = MemoryProgressRepository::default();
        let learner = LearnerId::random();
        let course = CourseId::random();
        let lesson = LessonId::random();

        repo.append_completion(&learner, &course, &lesson, at(100))
            .await
            .expect("first append");
        let record = repo
            .append_completion(&learner, &course, &lesson, at(200))
            .await
            .expect("second append");

        assert_eq!(record.completed_lessons.len(), 1);
        assert_eq!(record.updated_at, at(200));
    }

    #[tokio::test]
    async fn touch_access_creates_the_record_without_completions() {
        let repo = MemoryProgressRepository::default();
        let learner = LearnerId::random();
        let course = CourseId::random();
        let lesson = LessonId::random();

        repo.touch_access(&learner, &course, &lesson, at(50))
            .await
            .expect("touch");
        let record = repo
            .fetch(&learner, &course)
            .await
            .expect("fetch")
            .expect("record exists");

        assert!(record.completed_lessons.is_empty());
        assert_eq!(record.last_accessed_lesson, Some(lesson));
    }

    #[tokio::test]
    async fn repeat_signup_keeps_the_original_timestamp() {
        let repo = MemoryMeetupSignupRepository::default();
        let learner = LearnerId::random();
        let meetup = MeetupId::random();
        let first = MeetupSignup {
            learner_id: learner.clone(),
            meetup_id: meetup.clone(),
            created_at: at(10),
        };
        let second = MeetupSignup {
            created_at: at(20),
            ..first.clone()
        };

        repo.save(&first).await.expect("first save");
        repo.save(&second).await.expect("second save");
        let signups = repo.list_for_learner(&learner).await.expect("list");

        assert_eq!(signups.len(), 1);
        assert_eq!(signups[0].created_at, at(10));
    }

    #[tokio::test]
    async fn seeded_enrollments_are_findable() {
        let learner = LearnerId::random();
        let course = CourseId::random();
        let repo = MemoryEnrollmentRepository::seeded(vec![Enrollment {
            learner_id: learner.clone(),
            course_id: course.clone(),
            kind: EnrollmentKind::Free,
            payment_status: PaymentStatus::Free,
            completed: false,
            created_at: at(1),
        }]);

        let found = repo
            .find(&learner, &course)
            .await
            .expect("find")
            .expect("enrollment present");
        assert!(found.grants_access());

        let absent = repo
            .find(&learner, &CourseId::random())
            .await
            .expect("find");
        assert!(absent.is_none());
    }

    #[rstest]
    fn fixture_catalog_loads_from_json() {
        let course = CourseId::random();
        let lesson = LessonId::random();
        let raw = format!(
            r#"[{{"id": "{course}", "mediaPrefix": "courses/rust-101", "lessons": [{{"id": "{lesson}", "mediaKey": "courses/rust-101/intro.mp4"}}]}}]"#
        );
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(raw.as_bytes()).expect("write fixture");

        let catalog = FixtureLessonCatalog::load_fixture(file.path()).expect("fixture loads");
        assert_eq!(catalog.courses.len(), 1);
        let outline = catalog.outline(&course).expect("course present");
        assert_eq!(outline.media_prefix, "courses/rust-101");
        assert_eq!(outline.lessons[0].id, lesson);
    }

    #[tokio::test]
    async fn unknown_course_is_reported_by_the_catalog() {
        let catalog = FixtureLessonCatalog::default();
        let error = catalog
            .count_lessons(&CourseId::random())
            .await
            .expect_err("unknown course");
        assert!(matches!(error, LessonCatalogError::UnknownCourse { .. }));
    }
}
