//! Driven port for the external identity collaborator.
//!
//! Account signup, login, session establishment, and email confirmation
//! delivery all live outside this service. The review domain consumes two
//! narrow facts: whether a user's email is verified, and a password-change
//! passthrough whose mechanics the collaborator owns.

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::password::PasswordChange;
use crate::domain::user::UserId;

/// Identity operations the review service delegates.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Whether the user has a verified email address on record.
    async fn is_verified(&self, user: UserId) -> Result<bool, DomainError>;

    /// Replace the user's password, verifying the current one first.
    ///
    /// A rejected current password surfaces as an invalid-request error with
    /// a `currentPassword` field detail so callers can redisplay the form.
    async fn change_password(
        &self,
        user: UserId,
        change: &PasswordChange,
    ) -> Result<(), DomainError>;
}
