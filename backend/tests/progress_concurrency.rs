//! Concurrency behaviour of completion tracking over the in-memory store.
//!
//! The progress service delegates every mutation to an atomic repository
//! primitive, so racing completion calls must never lose set members and
//! re-completing a lesson must never inflate the percentage.

use std::sync::Arc;

use mockable::DefaultClock;
use studyhall_backend::domain::ports::{CourseOutline, ProgressTracking};
use studyhall_backend::domain::{CourseId, LearnerId, LessonId, ProgressService};
use studyhall_backend::outbound::persistence::{FixtureLessonCatalog, MemoryProgressRepository};

const LESSON_COUNT: usize = 8;

fn course_with_lessons(course_id: &CourseId, lessons: &[LessonId]) -> FixtureLessonCatalog {
    let raw = serde_json::json!([{
        "id": course_id.as_ref(),
        "mediaPrefix": "courses/fixture",
        "lessons": lessons
            .iter()
            .map(|lesson| {
                serde_json::json!({
                    "id": lesson.as_ref(),
                    "mediaKey": format!("courses/fixture/{lesson}.mp4"),
                })
            })
            .collect::<Vec<_>>(),
    }]);
    let outlines: Vec<CourseOutline> =
        serde_json::from_value(raw).expect("fixture outline parses");
    FixtureLessonCatalog::new(outlines)
}

fn service_over(
    catalog: FixtureLessonCatalog,
) -> ProgressService<MemoryProgressRepository, FixtureLessonCatalog> {
    ProgressService::new(
        Arc::new(MemoryProgressRepository::default()),
        Arc::new(catalog),
        Arc::new(DefaultClock),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_completions_of_distinct_lessons_all_land() {
    let course = CourseId::random();
    let lessons: Vec<LessonId> = (0..LESSON_COUNT).map(|_| LessonId::random()).collect();
    let service = Arc::new(service_over(course_with_lessons(&course, &lessons)));
    let learner = LearnerId::random();

    let mut tasks = Vec::new();
    for lesson in &lessons {
        let service = Arc::clone(&service);
        let learner = learner.clone();
        let course = course.clone();
        let lesson = lesson.clone();
        tasks.push(tokio::spawn(async move {
            service
                .record_completion(&learner, &course, &lesson)
                .await
                .expect("completion succeeds")
        }));
    }
    for task in tasks {
        task.await.expect("task completes");
    }

    let snapshot = service
        .get_snapshot(&learner, &course)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.completed_lessons.len(), LESSON_COUNT);
    assert_eq!(snapshot.percentage, 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_completions_of_the_same_lesson_count_once() {
    let course = CourseId::random();
    let lessons: Vec<LessonId> = (0..4).map(|_| LessonId::random()).collect();
    let service = Arc::new(service_over(course_with_lessons(&course, &lessons)));
    let learner = LearnerId::random();
    let target = lessons[0].clone();

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        let learner = learner.clone();
        let course = course.clone();
        let lesson = target.clone();
        tasks.push(tokio::spawn(async move {
            service
                .record_completion(&learner, &course, &lesson)
                .await
                .expect("completion succeeds")
        }));
    }
    for task in tasks {
        let snapshot = task.await.expect("task completes");
        // Every racer observes the lesson in the set it returned.
        assert!(snapshot.completed_lessons.contains(&target));
    }

    let snapshot = service
        .get_snapshot(&learner, &course)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.completed_lessons.len(), 1);
    assert_eq!(snapshot.percentage, 25);
}

#[tokio::test]
async fn out_of_order_completions_accumulate_as_a_set() {
    let course = CourseId::random();
    let lessons: Vec<LessonId> = (0..5).map(|_| LessonId::random()).collect();
    let service = service_over(course_with_lessons(&course, &lessons));
    let learner = LearnerId::random();

    for index in [2, 0, 1] {
        service
            .record_completion(&learner, &course, &lessons[index])
            .await
            .expect("completion succeeds");
    }

    let snapshot = service
        .get_snapshot(&learner, &course)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.completed_lessons.len(), 3);
    for index in [0, 1, 2] {
        assert!(snapshot.completed_lessons.contains(&lessons[index]));
    }
    assert_eq!(snapshot.percentage, 60);
}

#[tokio::test]
async fn repeat_completion_leaves_the_percentage_unchanged() {
    let course = CourseId::random();
    let lessons: Vec<LessonId> = (0..3).map(|_| LessonId::random()).collect();
    let service = service_over(course_with_lessons(&course, &lessons));
    let learner = LearnerId::random();

    let first = service
        .record_completion(&learner, &course, &lessons[0])
        .await
        .expect("first completion");
    let second = service
        .record_completion(&learner, &course, &lessons[0])
        .await
        .expect("repeat completion");

    assert_eq!(first.percentage, 33);
    assert_eq!(second.percentage, 33);
    assert_eq!(second.completed_lessons.len(), 1);
}
