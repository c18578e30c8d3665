//! Persistence adapters implementing the domain's repository ports.
//!
//! Diesel-backed adapters serve production against PostgreSQL; the in-memory
//! adapters back fixture mode and tests. Database row models stay internal
//! to this module, so domain types never leak table layout.

mod diesel_enrollment_repository;
mod diesel_meetup_signup_repository;
mod diesel_progress_repository;
mod memory;
mod models;
mod pool;
mod schema;

pub use self::diesel_enrollment_repository::DieselEnrollmentRepository;
pub use self::diesel_meetup_signup_repository::DieselMeetupSignupRepository;
pub use self::diesel_progress_repository::DieselProgressRepository;
pub use self::memory::{
    FixtureLessonCatalog, MemoryEnrollmentRepository, MemoryMeetupSignupRepository,
    MemoryProgressRepository,
};
pub use self::pool::{DbPool, PoolConfig, PoolError};
