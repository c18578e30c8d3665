//! Strongly typed identifiers for learners, courses, lessons, and meetups.
//!
//! Each identifier wraps a UUID together with its canonical string form so
//! session cookies, URLs, and database rows all agree on one representation.
//! Construction validates the input; an identifier in hand is always a valid
//! UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation error raised when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The input was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The input was not a valid UUID.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid, String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            ///
            /// # Errors
            /// Returns [`IdValidationError`] when the input is empty or not a
            /// valid UUID.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::from_owned(id.as_ref().to_owned())
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                let uuid = Uuid::new_v4();
                Self(uuid, uuid.to_string())
            }

            /// Construct an identifier from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid, uuid.to_string())
            }

            fn from_owned(id: String) -> Result<Self, IdValidationError> {
                if id.is_empty() {
                    return Err(IdValidationError::Empty);
                }
                if id.trim() != id {
                    return Err(IdValidationError::Invalid);
                }
                let parsed = Uuid::parse_str(&id).map_err(|_| IdValidationError::Invalid)?;
                Ok(Self(parsed, id))
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.1.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                let $name(_, raw) = value;
                raw
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }
    };
}

uuid_id! {
    /// Stable learner identifier stored as a UUID.
    LearnerId
}

uuid_id! {
    /// Stable course identifier stored as a UUID.
    CourseId
}

uuid_id! {
    /// Stable lesson identifier stored as a UUID.
    LessonId
}

uuid_id! {
    /// Stable recurring-meetup identifier stored as a UUID.
    MeetupId
}

#[cfg(test)]
mod tests {
    //! Identifier validation coverage; the macro is exercised through one
    //! representative type.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn accepts_canonical_uuid_strings() {
        let id = LearnerId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case("not-a-uuid", IdValidationError::Invalid)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Invalid)]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(CourseId::new(raw), Err(expected));
    }

    #[rstest]
    fn serde_round_trips_through_string() {
        let id = LessonId::random();
        let raw = serde_json::to_string(&id).expect("serialises");
        let parsed: LessonId = serde_json::from_str(&raw).expect("deserialises");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn from_uuid_matches_display() {
        let uuid = uuid::Uuid::new_v4();
        let id = MeetupId::from_uuid(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(id.as_uuid(), &uuid);
    }
}
