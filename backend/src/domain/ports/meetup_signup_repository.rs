//! Port abstraction for meetup signup persistence.

use async_trait::async_trait;

use crate::domain::{LearnerId, MeetupSignup};

/// Errors raised by meetup signup repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeetupSignupRepositoryError {
    /// Store connection could not be established or timed out.
    #[error("meetup signup store connection failed: {message}")]
    Connection {
        /// Adapter-supplied detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("meetup signup store query failed: {message}")]
    Query {
        /// Adapter-supplied detail.
        message: String,
    },
}

impl MeetupSignupRepositoryError {
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

/// Port for durable (learner, meetup) signup records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetupSignupRepository: Send + Sync {
    /// Insert a signup, a no-op when the pair already exists.
    async fn save(&self, signup: &MeetupSignup) -> Result<(), MeetupSignupRepositoryError>;

    /// List all signups recorded for a learner.
    async fn list_for_learner(
        &self,
        learner_id: &LearnerId,
    ) -> Result<Vec<MeetupSignup>, MeetupSignupRepositoryError>;
}
