//! Password-change payload validation.
//!
//! Password mechanics (hashing scheme, history, lockout) belong to the
//! identity collaborator. The domain only validates the submitted payload
//! shape before handing it to the [`IdentityService`] port and keeps the raw
//! material zeroised once dropped.
//!
//! [`IdentityService`]: crate::domain::ports::IdentityService

use std::fmt;

use zeroize::Zeroizing;

/// Minimum accepted length for a new password.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Domain error returned when a password-change payload is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeValidationError {
    /// The current password was blank.
    EmptyCurrentPassword,
    /// The new password is shorter than [`PASSWORD_MIN_CHARS`].
    NewPasswordTooShort,
}

impl PasswordChangeValidationError {
    /// The submitted field this error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyCurrentPassword => "currentPassword",
            Self::NewPasswordTooShort => "newPassword",
        }
    }
}

impl fmt::Display for PasswordChangeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCurrentPassword => write!(f, "current password must not be empty"),
            Self::NewPasswordTooShort => {
                write!(f, "new password must be at least {PASSWORD_MIN_CHARS} characters")
            }
        }
    }
}

impl std::error::Error for PasswordChangeValidationError {}

/// Validated password-change request.
///
/// ## Invariants
/// - `current` is non-empty; it retains caller-provided whitespace to avoid
///   surprising credential comparisons.
/// - `new` has at least [`PASSWORD_MIN_CHARS`] characters.
#[derive(Clone)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    new: Zeroizing<String>,
}

impl PasswordChange {
    /// Construct a change request from raw current/new password inputs.
    pub fn try_from_parts(
        current: &str,
        new: &str,
    ) -> Result<Self, PasswordChangeValidationError> {
        if current.is_empty() {
            return Err(PasswordChangeValidationError::EmptyCurrentPassword);
        }
        if new.chars().count() < PASSWORD_MIN_CHARS {
            return Err(PasswordChangeValidationError::NewPasswordTooShort);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            new: Zeroizing::new(new.to_owned()),
        })
    }

    /// The password the user claims to currently hold.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The replacement password.
    #[must_use]
    pub fn new_password(&self) -> &str {
        &self.new
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}
