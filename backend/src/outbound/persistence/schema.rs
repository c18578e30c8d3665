//! Diesel schema definitions for the backend database.

diesel::table! {
    /// One enrollment per (learner, course) pair.
    enrollments (learner_id, course_id) {
        /// The enrolled learner.
        learner_id -> Uuid,
        /// The course the enrollment grants rights to.
        course_id -> Uuid,
        /// How the enrollment was obtained: free, paid, or bundle.
        kind -> Varchar,
        /// Payment state: free, pending, completed, or failed.
        payment_status -> Varchar,
        /// Whether the learner has completed every lesson.
        completed -> Bool,
        /// When the enrollment was created.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-(learner, course) progress header row.
    course_progress (learner_id, course_id) {
        /// The owning learner.
        learner_id -> Uuid,
        /// The course being tracked.
        course_id -> Uuid,
        /// The lesson most recently accessed or completed.
        last_accessed_lesson -> Nullable<Uuid>,
        /// When the record last changed.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows of the completed-lesson set. The composite primary
    /// key makes re-completing a lesson a conflict, not a duplicate.
    completed_lessons (learner_id, course_id, lesson_id) {
        /// The owning learner.
        learner_id -> Uuid,
        /// The course the lesson belongs to.
        course_id -> Uuid,
        /// The completed lesson.
        lesson_id -> Uuid,
        /// When the completion was first recorded.
        completed_at -> Timestamptz,
    }
}

diesel::table! {
    /// One signup per (learner, meetup) pair.
    meetup_signups (learner_id, meetup_id) {
        /// The registering learner.
        learner_id -> Uuid,
        /// The meetup signed up for.
        meetup_id -> Uuid,
        /// When the signup was first recorded.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(course_progress, completed_lessons);
