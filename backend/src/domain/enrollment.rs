//! Enrollment entity: a learner's access rights to one course.
//!
//! Enrollments are created once per (learner, course) pair and never deleted
//! in normal operation. Media access is a pure function of the payment
//! status; how the enrollment came to exist (free signup, checkout, bundle)
//! is irrelevant to authorization.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, LearnerId};

/// How the learner obtained the enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentKind {
    /// Free course signup, no payment involved.
    Free,
    /// Individually purchased course.
    Paid,
    /// Part of a multi-course bundle purchase.
    Bundle,
}

impl fmt::Display for EnrollmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Free => "free",
            Self::Paid => "paid",
            Self::Bundle => "bundle",
        };
        f.write_str(value)
    }
}

/// Error raised when a stored enum string does not match a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {field} value: {value}")]
pub struct UnknownVariant {
    /// The field being parsed.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
}

impl FromStr for EnrollmentKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "paid" => Ok(Self::Paid),
            "bundle" => Ok(Self::Bundle),
            other => Err(UnknownVariant {
                field: "enrollment kind",
                value: other.to_owned(),
            }),
        }
    }
}

/// Payment state of an enrollment.
///
/// `Pending` and `Failed` enrollments exist (the learner started a checkout)
/// but grant no media access until payment completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No payment required.
    Free,
    /// Checkout started, payment not yet confirmed.
    Pending,
    /// Payment confirmed.
    Completed,
    /// Payment attempted and declined.
    Failed,
}

impl PaymentStatus {
    /// Whether this payment status grants media access.
    #[must_use]
    pub const fn grants_access(self) -> bool {
        matches!(self, Self::Free | Self::Completed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Free => "free",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(value)
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownVariant {
                field: "payment status",
                value: other.to_owned(),
            }),
        }
    }
}

/// A learner's enrollment in one course.
///
/// ## Invariants
/// - One enrollment exists per (learner, course) pair.
/// - Media access is granted only while [`PaymentStatus::grants_access`]
///   holds; the kind never influences authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// The enrolled learner.
    pub learner_id: LearnerId,
    /// The course the enrollment grants rights to.
    pub course_id: CourseId,
    /// How the enrollment was obtained.
    pub kind: EnrollmentKind,
    /// Current payment state.
    pub payment_status: PaymentStatus,
    /// Whether the learner has completed every lesson.
    pub completed: bool,
    /// When the enrollment was created.
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    /// Whether this enrollment currently grants media access.
    #[must_use]
    pub const fn grants_access(&self) -> bool {
        self.payment_status.grants_access()
    }
}
