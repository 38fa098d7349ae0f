//! Profile and account use-cases.
//!
//! Profiles combine a user record with a fixed-size preview of their newest
//! reviews; the preview is a display constant independent of the paginated
//! per-user listing. Signup completion copies the one custom field the
//! review service owns (the nickname) onto an account the identity
//! collaborator already created.

use std::sync::Arc;

use pagination::Page;

use super::error::DomainError;
use super::ports::{
    ReviewPersistenceError, ReviewRepository, UserPersistenceError, UserRepository,
};
use super::review::Review;
use super::reviews::listing_page_request;
use super::user::{Nickname, User, UserId};

/// Number of reviews shown in the profile side panel.
pub const PROFILE_PREVIEW_COUNT: u32 = 4;

/// A user together with their most recent reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user: User,
    /// At most [`PROFILE_PREVIEW_COUNT`] reviews, newest first.
    pub recent_reviews: Vec<Review>,
}

/// A user together with one page of all their reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReviews {
    pub user: User,
    pub reviews: Page<Review>,
}

fn map_user_error(error: UserPersistenceError) -> DomainError {
    match error {
        UserPersistenceError::Connection { message } => DomainError::service_unavailable(message),
        UserPersistenceError::Query { message } => DomainError::internal(message),
    }
}

fn map_review_error(error: ReviewPersistenceError) -> DomainError {
    match error {
        ReviewPersistenceError::Connection { message } => DomainError::service_unavailable(message),
        ReviewPersistenceError::Query { message } => DomainError::internal(message),
    }
}

/// Use-cases for profile pages and signup completion.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl ProfileService {
    /// Create a service over the given repositories.
    pub fn new(users: Arc<dyn UserRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { users, reviews }
    }

    async fn require_user(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    /// The profile page: the user plus their newest reviews.
    ///
    /// Two independent queries, not a join; the preview size is fixed and
    /// unaffected by listing pagination.
    pub async fn profile(&self, id: UserId) -> Result<Profile, DomainError> {
        let user = self.require_user(id).await?;
        let recent_reviews = self
            .reviews
            .recent_by_author(id, PROFILE_PREVIEW_COUNT)
            .await
            .map_err(map_review_error)?;
        Ok(Profile {
            user,
            recent_reviews,
        })
    }

    /// One page of all the user's reviews, newest first.
    pub async fn reviews_page(
        &self,
        id: UserId,
        page_number: u32,
    ) -> Result<UserReviews, DomainError> {
        let user = self.require_user(id).await?;
        let request = listing_page_request(page_number)?;
        let reviews = self
            .reviews
            .page_by_author(id, request)
            .await
            .map_err(map_review_error)?;
        Ok(UserReviews { user, reviews })
    }

    /// Copy the signup form's nickname onto the requester's user record.
    pub async fn complete_signup(
        &self,
        actor: UserId,
        nickname: Nickname,
    ) -> Result<User, DomainError> {
        self.users
            .set_nickname(actor, &nickname)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for profile lookups and signup completion.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use pagination::PageRequest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::ReviewPersistenceError;
    use crate::domain::review::{ReviewDraft, ReviewDraftInput, ReviewId};

    struct StubUserRepository {
        user: Mutex<Option<User>>,
    }

    impl StubUserRepository {
        fn empty() -> Self {
            Self {
                user: Mutex::new(None),
            }
        }

        fn with_user(user: User) -> Self {
            Self {
                user: Mutex::new(Some(user)),
            }
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
            Ok(self
                .user
                .lock()
                .expect("user lock")
                .clone()
                .filter(|user| user.id == id))
        }

        async fn set_nickname(
            &self,
            id: UserId,
            nickname: &Nickname,
        ) -> Result<Option<User>, UserPersistenceError> {
            let mut slot = self.user.lock().expect("user lock");
            match slot.take() {
                Some(user) if user.id == id => {
                    let updated = user.with_nickname(nickname.clone());
                    *slot = Some(updated.clone());
                    Ok(Some(updated))
                }
                other => {
                    *slot = other;
                    Ok(None)
                }
            }
        }
    }

    struct StubReviewRepository {
        recent: Vec<Review>,
    }

    #[async_trait]
    impl ReviewRepository for StubReviewRepository {
        async fn insert(&self, _review: &Review) -> Result<(), ReviewPersistenceError> {
            Ok(())
        }

        async fn find_by_id(
            &self,
            _id: ReviewId,
        ) -> Result<Option<Review>, ReviewPersistenceError> {
            Ok(None)
        }

        async fn update_fields(
            &self,
            _id: ReviewId,
            _draft: &ReviewDraft,
        ) -> Result<Option<Review>, ReviewPersistenceError> {
            Ok(None)
        }

        async fn delete(&self, _id: ReviewId) -> Result<bool, ReviewPersistenceError> {
            Ok(false)
        }

        async fn page(
            &self,
            request: PageRequest,
        ) -> Result<Page<Review>, ReviewPersistenceError> {
            Ok(Page::empty(request, 0))
        }

        async fn page_by_author(
            &self,
            _author_id: UserId,
            request: PageRequest,
        ) -> Result<Page<Review>, ReviewPersistenceError> {
            let total = self.recent.len() as u64;
            Ok(Page::new(self.recent.clone(), request, total))
        }

        async fn recent_by_author(
            &self,
            _author_id: UserId,
            limit: u32,
        ) -> Result<Vec<Review>, ReviewPersistenceError> {
            Ok(self.recent.iter().take(limit as usize).cloned().collect())
        }
    }

    fn subject() -> User {
        User {
            id: UserId::from_uuid(Uuid::from_u128(7)),
            nickname: Nickname::new("foodie").expect("valid nickname"),
            created_at: Utc::now(),
        }
    }

    fn review(author: UserId, title: &str) -> Review {
        let draft = ReviewDraft::validate(ReviewDraftInput {
            title: title.into(),
            restaurant_name: "Some Place".into(),
            restaurant_link: "https://example.com/some-place".into(),
            rating: 3,
            image1: None,
            image2: None,
            image3: None,
            content: "Fine.".into(),
        })
        .expect("valid draft");
        Review::from_draft(draft, author, Utc::now())
    }

    #[tokio::test]
    async fn profile_combines_user_and_preview() {
        let user = subject();
        let reviews: Vec<_> = (0..6).map(|n| review(user.id, &format!("r{n}"))).collect();
        let service = ProfileService::new(
            Arc::new(StubUserRepository::with_user(user.clone())),
            Arc::new(StubReviewRepository { recent: reviews }),
        );

        let profile = service.profile(user.id).await.expect("profile");

        assert_eq!(profile.user, user);
        assert_eq!(profile.recent_reviews.len(), PROFILE_PREVIEW_COUNT as usize);
    }

    #[tokio::test]
    async fn profile_preview_is_all_reviews_when_fewer_than_the_limit() {
        let user = subject();
        let reviews = vec![review(user.id, "only one")];
        let service = ProfileService::new(
            Arc::new(StubUserRepository::with_user(user.clone())),
            Arc::new(StubReviewRepository { recent: reviews }),
        );

        let profile = service.profile(user.id).await.expect("profile");
        assert_eq!(profile.recent_reviews.len(), 1);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let service = ProfileService::new(
            Arc::new(StubUserRepository::empty()),
            Arc::new(StubReviewRepository { recent: Vec::new() }),
        );

        let err = service
            .profile(UserId::from_uuid(Uuid::from_u128(9)))
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let err = service
            .reviews_page(UserId::from_uuid(Uuid::from_u128(9)), 1)
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn complete_signup_persists_the_nickname() {
        let user = subject();
        let users = Arc::new(StubUserRepository::with_user(user.clone()));
        let service = ProfileService::new(
            users.clone(),
            Arc::new(StubReviewRepository { recent: Vec::new() }),
        );

        let nickname = Nickname::new("new-foodie").expect("valid nickname");
        let updated = service
            .complete_signup(user.id, nickname.clone())
            .await
            .expect("signup completed");

        assert_eq!(updated.nickname, nickname);
        let stored = users.user.lock().expect("user lock").clone().expect("user kept");
        assert_eq!(stored.nickname, nickname);
    }
}
