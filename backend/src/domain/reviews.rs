//! Review lifecycle use-cases.
//!
//! [`ReviewService`] owns the rules the HTTP adapter must not: the author is
//! stamped from the authenticated requester at creation and never reassigned,
//! and only the author may update or delete a review. The verified-email gate
//! on creation is a view-layer concern and stays in the inbound adapter,
//! mirroring where the soft-redirect denial is produced.

use std::sync::Arc;

use chrono::Utc;
use pagination::{Page, PageRequest};

use super::error::DomainError;
use super::ports::{ReviewPersistenceError, ReviewRepository};
use super::review::{Review, ReviewDraft, ReviewId};
use super::user::UserId;

/// Fixed page size shared by the global and per-user review listings.
pub const REVIEWS_PER_PAGE: u32 = 4;

/// Map repository failures onto transport-agnostic domain errors.
fn map_persistence_error(error: ReviewPersistenceError) -> DomainError {
    match error {
        ReviewPersistenceError::Connection { message } => DomainError::service_unavailable(message),
        ReviewPersistenceError::Query { message } => DomainError::internal(message),
    }
}

/// Build a page request for a 1-based listing page number.
pub(crate) fn listing_page_request(page_number: u32) -> Result<PageRequest, DomainError> {
    PageRequest::new(page_number, REVIEWS_PER_PAGE)
        .map_err(|err| DomainError::invalid_request(err.to_string()))
}

/// Use-cases covering the review lifecycle.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    /// Create a service over the given repository.
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    /// One page of the global listing, newest first.
    pub async fn list(&self, page_number: u32) -> Result<Page<Review>, DomainError> {
        let request = listing_page_request(page_number)?;
        self.reviews
            .page(request)
            .await
            .map_err(map_persistence_error)
    }

    /// Load one review or fail with not-found.
    pub async fn get(&self, id: ReviewId) -> Result<Review, DomainError> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| DomainError::not_found("review not found"))
    }

    /// Persist a new review authored by `author`.
    ///
    /// The author comes from the authenticated session, never the payload,
    /// so authorship cannot be spoofed.
    pub async fn create(&self, author: UserId, draft: ReviewDraft) -> Result<Review, DomainError> {
        let review = Review::from_draft(draft, author, Utc::now());
        self.reviews
            .insert(&review)
            .await
            .map_err(map_persistence_error)?;
        Ok(review)
    }

    /// Confirm that `actor` owns review `id`.
    ///
    /// Fails with not-found when the review is missing and forbidden when
    /// the actor is not its author. Handlers run this before validating
    /// input so authorization failures win over validation failures.
    pub async fn authorize_author(&self, actor: UserId, id: ReviewId) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        ensure_author(&existing, actor)
    }

    /// Overwrite the editable fields of `id` on behalf of `actor`.
    ///
    /// Fails with not-found when the review is missing and forbidden when
    /// the actor is not its author.
    pub async fn update(
        &self,
        actor: UserId,
        id: ReviewId,
        draft: ReviewDraft,
    ) -> Result<Review, DomainError> {
        let existing = self.get(id).await?;
        ensure_author(&existing, actor)?;
        self.reviews
            .update_fields(id, &draft)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| DomainError::not_found("review not found"))
    }

    /// Remove `id` on behalf of `actor`, with the same gate as update.
    pub async fn delete(&self, actor: UserId, id: ReviewId) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        ensure_author(&existing, actor)?;
        let deleted = self
            .reviews
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if deleted {
            Ok(())
        } else {
            Err(DomainError::not_found("review not found"))
        }
    }
}

fn ensure_author(review: &Review, actor: UserId) -> Result<(), DomainError> {
    if review.author_id == actor {
        Ok(())
    } else {
        Err(DomainError::forbidden("only the author may modify a review"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for authorship rules and error mapping.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::review::ReviewDraftInput;

    #[derive(Default)]
    struct StubReviewRepository {
        stored: Mutex<Vec<Review>>,
        fail_with: Option<ReviewPersistenceError>,
    }

    impl StubReviewRepository {
        fn with_review(review: Review) -> Self {
            Self {
                stored: Mutex::new(vec![review]),
                fail_with: None,
            }
        }

        fn failing(error: ReviewPersistenceError) -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                fail_with: Some(error),
            }
        }

        fn check_failure(&self) -> Result<(), ReviewPersistenceError> {
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ReviewRepository for StubReviewRepository {
        async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
            self.check_failure()?;
            self.stored.lock().expect("store lock").push(review.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: ReviewId,
        ) -> Result<Option<Review>, ReviewPersistenceError> {
            self.check_failure()?;
            Ok(self
                .stored
                .lock()
                .expect("store lock")
                .iter()
                .find(|review| review.id == id)
                .cloned())
        }

        async fn update_fields(
            &self,
            id: ReviewId,
            draft: &ReviewDraft,
        ) -> Result<Option<Review>, ReviewPersistenceError> {
            self.check_failure()?;
            let mut stored = self.stored.lock().expect("store lock");
            let Some(slot) = stored.iter_mut().find(|review| review.id == id) else {
                return Ok(None);
            };
            *slot = slot.clone().with_draft(draft.clone());
            Ok(Some(slot.clone()))
        }

        async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError> {
            self.check_failure()?;
            let mut stored = self.stored.lock().expect("store lock");
            let before = stored.len();
            stored.retain(|review| review.id != id);
            Ok(stored.len() < before)
        }

        async fn page(
            &self,
            request: PageRequest,
        ) -> Result<Page<Review>, ReviewPersistenceError> {
            self.check_failure()?;
            let stored = self.stored.lock().expect("store lock");
            Ok(Page::new(stored.clone(), request, stored.len() as u64))
        }

        async fn page_by_author(
            &self,
            author_id: UserId,
            request: PageRequest,
        ) -> Result<Page<Review>, ReviewPersistenceError> {
            self.check_failure()?;
            let stored = self.stored.lock().expect("store lock");
            let mine: Vec<_> = stored
                .iter()
                .filter(|review| review.author_id == author_id)
                .cloned()
                .collect();
            let total = mine.len() as u64;
            Ok(Page::new(mine, request, total))
        }

        async fn recent_by_author(
            &self,
            author_id: UserId,
            limit: u32,
        ) -> Result<Vec<Review>, ReviewPersistenceError> {
            self.check_failure()?;
            let stored = self.stored.lock().expect("store lock");
            Ok(stored
                .iter()
                .filter(|review| review.author_id == author_id)
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    fn user(seed: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(seed))
    }

    fn draft(title: &str) -> ReviewDraft {
        ReviewDraft::validate(ReviewDraftInput {
            title: title.into(),
            restaurant_name: "Gwangjang Noodles".into(),
            restaurant_link: "https://example.com/gwangjang".into(),
            rating: 4,
            image1: None,
            image2: None,
            image3: None,
            content: "Knife-cut noodles, generous broth.".into(),
        })
        .expect("valid draft")
    }

    #[tokio::test]
    async fn create_stamps_the_requesting_author() {
        let repository = Arc::new(StubReviewRepository::default());
        let service = ReviewService::new(repository.clone());
        let author = user(1);

        let review = service.create(author, draft("First visit")).await.expect("created");

        assert_eq!(review.author_id, author);
        let stored = repository.stored.lock().expect("store lock");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].author_id, author);
    }

    #[tokio::test]
    async fn update_by_the_author_applies_the_draft() {
        let author = user(1);
        let review = Review::from_draft(draft("Original"), author, Utc::now());
        let id = review.id;
        let service = ReviewService::new(Arc::new(StubReviewRepository::with_review(review)));

        let updated = service
            .update(author, id, draft("Edited"))
            .await
            .expect("updated");

        assert_eq!(updated.title, "Edited");
        assert_eq!(updated.author_id, author);
    }

    #[tokio::test]
    async fn update_by_another_user_is_forbidden() {
        let review = Review::from_draft(draft("Original"), user(1), Utc::now());
        let id = review.id;
        let repository = Arc::new(StubReviewRepository::with_review(review));
        let service = ReviewService::new(repository.clone());

        let err = service
            .update(user(2), id, draft("Hijacked"))
            .await
            .expect_err("non-author must be denied");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        let stored = repository.stored.lock().expect("store lock");
        assert_eq!(stored[0].title, "Original");
    }

    #[tokio::test]
    async fn delete_by_another_user_is_forbidden_and_keeps_the_review() {
        let review = Review::from_draft(draft("Keep me"), user(1), Utc::now());
        let id = review.id;
        let repository = Arc::new(StubReviewRepository::with_review(review));
        let service = ReviewService::new(repository.clone());

        let err = service
            .delete(user(2), id)
            .await
            .expect_err("non-author must be denied");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(repository.stored.lock().expect("store lock").len(), 1);
    }

    #[tokio::test]
    async fn delete_by_the_author_removes_the_review() {
        let author = user(1);
        let review = Review::from_draft(draft("Gone soon"), author, Utc::now());
        let id = review.id;
        let repository = Arc::new(StubReviewRepository::with_review(review));
        let service = ReviewService::new(repository.clone());

        service.delete(author, id).await.expect("deleted");

        assert!(repository.stored.lock().expect("store lock").is_empty());
        let err = service.get(id).await.expect_err("review is gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn missing_review_is_not_found_before_the_ownership_check() {
        let service = ReviewService::new(Arc::new(StubReviewRepository::default()));
        let err = service
            .delete(user(2), ReviewId::generate())
            .await
            .expect_err("missing review");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(ReviewPersistenceError::connection("db down"), ErrorCode::ServiceUnavailable)]
    #[case(ReviewPersistenceError::query("bad query"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn persistence_failures_map_to_domain_errors(
        #[case] failure: ReviewPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let service = ReviewService::new(Arc::new(StubReviewRepository::failing(failure)));
        let err = service.list(1).await.expect_err("failure propagates");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn page_zero_is_an_invalid_request() {
        let service = ReviewService::new(Arc::new(StubReviewRepository::default()));
        let err = service.list(0).await.expect_err("page zero");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
