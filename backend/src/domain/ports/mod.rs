//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (secret store, repositories, lesson catalog) are consumed by
//! the domain services; driving ports (media access, progress tracking,
//! meetups) are what the HTTP layer calls. Every port is an async trait with
//! a `mockall` mock under `cfg(test)`.

mod enrollment_repository;
mod lesson_catalog;
mod media_access;
mod meetup_signup_repository;
mod meetups;
mod progress_repository;
mod progress_tracking;
mod secret_store;

#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_repository::{EnrollmentRepository, EnrollmentRepositoryError};
#[cfg(test)]
pub use lesson_catalog::MockLessonCatalog;
pub use lesson_catalog::{CourseOutline, LessonCatalog, LessonCatalogError, LessonEntry};
#[cfg(test)]
pub use media_access::MockMediaAccess;
pub use media_access::{CoursePass, MediaAccess, SignedResourceUrl};
#[cfg(test)]
pub use meetup_signup_repository::MockMeetupSignupRepository;
pub use meetup_signup_repository::{MeetupSignupRepository, MeetupSignupRepositoryError};
#[cfg(test)]
pub use meetups::MockMeetups;
pub use meetups::{Meetups, UpcomingMeetup};
#[cfg(test)]
pub use progress_repository::MockProgressRepository;
pub use progress_repository::{ProgressRepository, ProgressRepositoryError};
#[cfg(test)]
pub use progress_tracking::MockProgressTracking;
pub use progress_tracking::ProgressTracking;
#[cfg(test)]
pub use secret_store::MockSecretStore;
pub use secret_store::{SecretStore, SecretStoreError};
