//! Driven port for review persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::review::{Review, ReviewDraft, ReviewId};
use crate::domain::user::UserId;

/// Failures surfaced by review persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewPersistenceError {
    /// The backing store could not be reached.
    #[error("review store unreachable: {message}")]
    Connection { message: String },
    /// A query failed once connected.
    #[error("review query failed: {message}")]
    Query { message: String },
}

impl ReviewPersistenceError {
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

/// Persistence operations the review lifecycle depends on.
///
/// Listing queries return reviews strictly ordered by creation time
/// descending; implementations own the ordering so every caller observes the
/// same sequence.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a freshly created review.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Load one review by identifier.
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Overwrite the user-editable fields of an existing review.
    ///
    /// Authorship and the creation timestamp are never touched. Returns the
    /// updated review, or `None` when the id is unknown.
    async fn update_fields(
        &self,
        id: ReviewId,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Remove a review permanently. Returns whether a record was deleted.
    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError>;

    /// One page of the global listing, newest first.
    async fn page(&self, request: PageRequest) -> Result<Page<Review>, ReviewPersistenceError>;

    /// One page of a single author's reviews, newest first.
    async fn page_by_author(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Review>, ReviewPersistenceError>;

    /// The author's `limit` most recent reviews, newest first.
    async fn recent_by_author(
        &self,
        author_id: UserId,
        limit: u32,
    ) -> Result<Vec<Review>, ReviewPersistenceError>;
}
