//! Driving port for authorized media credential issuance.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CourseId, Error, LearnerId, LessonId};

/// A signed single-resource URL with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedResourceUrl {
    /// Absolute URL carrying `Expires`, `Signature`, and `Key-Pair-Id`
    /// query parameters.
    pub url: String,
    /// Expiry as Unix epoch seconds.
    pub expires_at: i64,
}

/// A whole-course cookie credential set.
///
/// The three values map onto the `CloudFront-Policy`,
/// `CloudFront-Signature`, and `CloudFront-Key-Pair-Id` cookies the
/// content-delivery edge verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePass {
    /// URL-safe base64 encoding of the policy JSON.
    pub policy: String,
    /// URL-safe base64 encoding of the policy signature.
    pub signature: String,
    /// Identifier of the verifying key pair.
    pub key_pair_id: String,
    /// Cookie path scoping the triple to the course's media prefix.
    pub path: String,
    /// Expiry as Unix epoch seconds, shared by all three cookies.
    pub expires_at: i64,
}

/// Driving port composing enrollment authorization with credential issuance.
///
/// Both operations re-check enrollment on every call; no credential is ever
/// minted, even speculatively, before the check passes. The catalog is
/// consulted only after authorization succeeds, so a denied caller learns
/// nothing about which courses exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaAccess: Send + Sync {
    /// Authorize the learner for the course, resolve the lesson's media
    /// key, then sign a time-limited URL for that object.
    ///
    /// # Errors
    /// `Forbidden` when the enrollment is absent or not in an
    /// access-granting payment state, `NotFound` when the authorized course
    /// or lesson is missing from the catalog, `ServiceUnavailable` when the
    /// signing key cannot be fetched, `InvalidRequest` when `expiry_minutes`
    /// is zero.
    async fn authorize_and_issue_resource_token(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
        lesson_id: &LessonId,
        expiry_minutes: u32,
    ) -> Result<SignedResourceUrl, Error>;

    /// Authorize the learner for the course, then issue the cookie triple
    /// covering every resource under the course's media prefix for the next
    /// 24 hours.
    async fn authorize_and_issue_course_pass(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<CoursePass, Error>;
}
