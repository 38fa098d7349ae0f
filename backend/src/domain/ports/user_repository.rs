//! Driven port for user persistence.

use async_trait::async_trait;

use crate::domain::user::{Nickname, User, UserId};

/// Failures surfaced by user persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// The backing store could not be reached.
    #[error("user store unreachable: {message}")]
    Connection { message: String },
    /// A query failed once connected.
    #[error("user query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
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

/// User record operations the review service depends on.
///
/// Account creation and deletion belong to the identity collaborator; the
/// only write exposed here is the post-signup nickname copy.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Load one user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Persist a new nickname on an existing user.
    ///
    /// Returns the updated user, or `None` when the id is unknown.
    async fn set_nickname(
        &self,
        id: UserId,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError>;
}
