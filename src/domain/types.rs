//! Value objects carried by client records.
//!
//! Each wrapper normalizes its input once on construction (and on
//! deserialization), so code holding one never re-validates it.

use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    #[error("id must be greater than zero")]
    NonPositiveId,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("value cannot be empty")]
    EmptyString,
    #[error("value exceeds {0} characters")]
    TooLong(usize),
}

/// Maximum stored length of the free-text details field.
pub const DETAILS_MAX_LEN: usize = 1000;

/// Server-assigned identifier of a client record. Never changes once issued.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub struct ClientId(i32);

impl ClientId {
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveId)
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for i32 {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

fn required(value: String) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    Ok(trimmed.to_string())
}

fn email(value: String) -> Result<String, TypeConstraintError> {
    let normalized = value.trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Strips markup; empty input is allowed.
fn details(value: String) -> Result<String, TypeConstraintError> {
    let sanitized = ammonia::clean(&value);
    let trimmed = sanitized.trim();
    if trimmed.chars().count() > DETAILS_MAX_LEN {
        return Err(TypeConstraintError::TooLong(DETAILS_MAX_LEN));
    }
    Ok(trimmed.to_string())
}

/// String wrapper whose constructor runs `$normalize`.
macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident, $normalize:path) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                $normalize(value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text_value!(
    /// Full legal name of a client.
    FullName,
    required
);
text_value!(
    /// Short name shown in lists and notifications.
    DisplayName,
    required
);
text_value!(
    /// Common English country name, e.g. `Netherlands`.
    CountryName,
    required
);
text_value!(
    /// Lower-cased, syntactically valid email address. Unique per client.
    ClientEmail,
    email
);
text_value!(
    /// Free-text notes with markup removed.
    ClientDetails,
    details
);

impl Default for ClientDetails {
    fn default() -> Self {
        Self(String::new())
    }
}
