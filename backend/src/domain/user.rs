//! User identity and display-name types.
//!
//! Accounts themselves are created by the external identity collaborator at
//! signup; this module only models the record the review service reads and
//! the one field it is allowed to write (the nickname).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum nickname length in characters.
pub const NICKNAME_MAX_CHARS: usize = 32;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors raised when validating a nickname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicknameError {
    /// The nickname was missing or blank once trimmed.
    Empty,
    /// The nickname exceeds [`NICKNAME_MAX_CHARS`].
    TooLong,
}

impl fmt::Display for NicknameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "nickname must not be empty"),
            Self::TooLong => write!(f, "nickname must be at most {NICKNAME_MAX_CHARS} characters"),
        }
    }
}

impl std::error::Error for NicknameError {}

/// Validated display name.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty.
/// - At most [`NICKNAME_MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    /// Construct a nickname from raw input, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self, NicknameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NicknameError::Empty);
        }
        if trimmed.chars().count() > NICKNAME_MAX_CHARS {
            return Err(NicknameError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated nickname text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user as seen by the review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier assigned at signup.
    pub id: UserId,
    /// Display name shown alongside the user's reviews.
    pub nickname: Nickname,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Return a copy of this user carrying a new nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: Nickname) -> Self {
        self.nickname = nickname;
        self
    }
}
