//! Shared test doubles and app assembly for endpoint tests.
//!
//! The doubles implement the domain ports over in-memory state with the
//! same observable semantics as the Diesel adapters: listings are ordered
//! by creation time descending and paginated by offset.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::{test, web, App, HttpResponse};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use coplate::domain::ports::{
    IdentityService, ReviewPersistenceError, ReviewRepository, UserPersistenceError,
    UserRepository,
};
use coplate::domain::{
    DomainError, Nickname, PasswordChange, Review, ReviewDraft, ReviewDraftInput, ReviewId, User,
    UserId,
};
use coplate::inbound::http::account::{change_password, complete_signup, confirmation_required};
use coplate::inbound::http::health::{live, ready, HealthState};
use coplate::inbound::http::reviews::{
    create_review, delete_review, list_reviews, review_detail, update_review,
};
use coplate::inbound::http::session::SessionContext;
use coplate::inbound::http::state::HttpState;
use coplate::inbound::http::users::{profile, user_review_list};
use coplate::inbound::http::ApiError;
use coplate::Trace;

/// In-memory `ReviewRepository` mirroring the Diesel adapter's ordering.
#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewRepository {
    /// Seed a review directly, bypassing the HTTP surface.
    pub fn seed(&self, review: Review) {
        self.reviews.lock().expect("review lock").push(review);
    }

    fn sorted(&self) -> Vec<Review> {
        let mut all = self.reviews.lock().expect("review lock").clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    fn page_of(items: Vec<Review>, request: PageRequest) -> Page<Review> {
        let total = items.len() as u64;
        let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let page: Vec<Review> = items
            .into_iter()
            .skip(start)
            .take(request.limit() as usize)
            .collect();
        Page::new(page, request, total)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        self.reviews
            .lock()
            .expect("review lock")
            .push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(self
            .reviews
            .lock()
            .expect("review lock")
            .iter()
            .find(|review| review.id == id)
            .cloned())
    }

    async fn update_fields(
        &self,
        id: ReviewId,
        draft: &ReviewDraft,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut reviews = self.reviews.lock().expect("review lock");
        let Some(slot) = reviews.iter_mut().find(|review| review.id == id) else {
            return Ok(None);
        };
        *slot = slot.clone().with_draft(draft.clone());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut reviews = self.reviews.lock().expect("review lock");
        let before = reviews.len();
        reviews.retain(|review| review.id != id);
        Ok(reviews.len() < before)
    }

    async fn page(&self, request: PageRequest) -> Result<Page<Review>, ReviewPersistenceError> {
        Ok(Self::page_of(self.sorted(), request))
    }

    async fn page_by_author(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Review>, ReviewPersistenceError> {
        let mine: Vec<Review> = self
            .sorted()
            .into_iter()
            .filter(|review| review.author_id == author_id)
            .collect();
        Ok(Self::page_of(mine, request))
    }

    async fn recent_by_author(
        &self,
        author_id: UserId,
        limit: u32,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|review| review.author_id == author_id)
            .take(limit as usize)
            .collect())
    }
}

/// In-memory `UserRepository`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    /// Seed a user record.
    pub fn seed(&self, user: User) {
        self.users
            .lock()
            .expect("user lock")
            .insert(user.id.as_uuid(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .lock()
            .expect("user lock")
            .get(&id.as_uuid())
            .cloned())
    }

    async fn set_nickname(
        &self,
        id: UserId,
        nickname: &Nickname,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = self.users.lock().expect("user lock");
        let Some(user) = users.get_mut(&id.as_uuid()) else {
            return Ok(None);
        };
        *user = user.clone().with_nickname(nickname.clone());
        Ok(Some(user.clone()))
    }
}

/// Identity double: a set of verified users plus stored passwords.
#[derive(Default)]
pub struct StubIdentityService {
    verified: Mutex<HashSet<Uuid>>,
    passwords: Mutex<HashMap<Uuid, String>>,
}

impl StubIdentityService {
    /// Mark a user's email as verified.
    pub fn verify(&self, user: UserId) {
        self.verified
            .lock()
            .expect("verified lock")
            .insert(user.as_uuid());
    }

    /// Record the user's current password.
    pub fn set_password(&self, user: UserId, password: &str) {
        self.passwords
            .lock()
            .expect("password lock")
            .insert(user.as_uuid(), password.to_owned());
    }

    /// The password currently on record, if any.
    pub fn password_of(&self, user: UserId) -> Option<String> {
        self.passwords
            .lock()
            .expect("password lock")
            .get(&user.as_uuid())
            .cloned()
    }
}

#[async_trait]
impl IdentityService for StubIdentityService {
    async fn is_verified(&self, user: UserId) -> Result<bool, DomainError> {
        Ok(self
            .verified
            .lock()
            .expect("verified lock")
            .contains(&user.as_uuid()))
    }

    async fn change_password(
        &self,
        user: UserId,
        change: &PasswordChange,
    ) -> Result<(), DomainError> {
        let mut passwords = self.passwords.lock().expect("password lock");
        let Some(stored) = passwords.get(&user.as_uuid()) else {
            return Err(DomainError::not_found("user not found"));
        };
        if stored != change.current() {
            return Err(DomainError::invalid_request("current password does not match")
                .with_details(serde_json::json!({
                    "fields": [{ "field": "currentPassword", "code": "mismatch" }]
                })));
        }
        passwords.insert(user.as_uuid(), change.new_password().to_owned());
        Ok(())
    }
}

/// Everything a test needs to drive the app and inspect its state.
pub struct TestHarness {
    pub reviews: Arc<InMemoryReviewRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub identity: Arc<StubIdentityService>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            reviews: Arc::new(InMemoryReviewRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
            identity: Arc::new(StubIdentityService::default()),
        }
    }

    pub fn state(&self) -> HttpState {
        HttpState::new(
            self.reviews.clone(),
            self.users.clone(),
            self.identity.clone(),
        )
    }

    /// Seed a user record and return its id.
    pub fn seed_user(&self, seed: u128, nickname: &str) -> UserId {
        let id = UserId::from_uuid(Uuid::from_u128(seed));
        self.users.seed(User {
            id,
            nickname: Nickname::new(nickname).expect("valid nickname"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("date"),
        });
        id
    }

    /// Seed a review with a deterministic timestamp offset in minutes.
    pub fn seed_review(&self, author: UserId, title: &str, minutes: i64) -> ReviewId {
        let draft = ReviewDraft::validate(ReviewDraftInput {
            title: title.into(),
            restaurant_name: "Somewhere Tasty".into(),
            restaurant_link: "https://example.com/somewhere".into(),
            rating: 4,
            image1: None,
            image2: None,
            image3: None,
            content: "Worth a detour.".into(),
        })
        .expect("valid draft");
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).single().expect("date");
        let review = Review::from_draft(draft, author, base + Duration::minutes(minutes));
        let id = review.id;
        self.reviews.seed(review);
        id
    }
}

/// Build the app under test: the production route table plus a test-only
/// login route that persists a user id into the session.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(HealthState::new()))
        .wrap(session)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .route(
            "/test-login/{user_id}",
            web::post().to(
                |session: SessionContext, user_id: web::Path<Uuid>| async move {
                    session.persist_user(UserId::from_uuid(user_id.into_inner()))?;
                    Ok::<_, ApiError>(HttpResponse::Ok().finish())
                },
            ),
        )
        .service(list_reviews)
        .service(review_detail)
        .service(create_review)
        .service(update_review)
        .service(delete_review)
        .service(profile)
        .service(user_review_list)
        .service(complete_signup)
        .service(change_password)
        .service(confirmation_required)
}

/// Log `user` in against the running test service and return the session
/// cookie to attach to later requests.
pub async fn login<S, B>(app: &S, user: UserId) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test-login/{user}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
