//! Review API handlers.
//!
//! ```text
//! GET    /reviews?page=N          paginated global listing, newest first
//! GET    /reviews/{review_id}     review detail
//! POST   /reviews                 create (verified authors only)
//! PUT    /reviews/{review_id}     update (author only)
//! DELETE /reviews/{review_id}     delete (author only)
//! ```
//!
//! Creation denies softly: an unauthenticated or unverified requester is
//! redirected to the confirmation-required page instead of receiving an
//! error status. Update and delete deny hard with 401/403/404 and never
//! redirect. The asymmetry is an observable contract, not an accident.

use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    DomainError, Review, ReviewDraft, ReviewDraftInput, ReviewId, ReviewValidationError,
};
use crate::inbound::http::account::CONFIRMATION_REQUIRED_PATH;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{see_other, ApiError, ApiResult};

/// Listing index path, also the post-delete redirect target.
pub const REVIEWS_PATH: &str = "/reviews";

/// Detail path for one review.
#[must_use]
pub fn review_detail_path(id: ReviewId) -> String {
    format!("{REVIEWS_PATH}/{id}")
}

/// Redirect used for both unauthenticated and unverified creation attempts.
///
/// The two cases are deliberately indistinguishable to the client.
fn confirmation_required_redirect() -> HttpResponse {
    see_other(CONFIRMATION_REQUIRED_PATH)
}

/// User-submitted review fields.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub title: String,
    pub restaurant_name: String,
    /// External link to the reviewed restaurant.
    pub restaurant_link: String,
    /// One of the fixed rating choices 1–5.
    pub rating: u8,
    #[serde(default)]
    pub image1: Option<String>,
    #[serde(default)]
    pub image2: Option<String>,
    #[serde(default)]
    pub image3: Option<String>,
    pub content: String,
}

impl From<ReviewPayload> for ReviewDraftInput {
    fn from(value: ReviewPayload) -> Self {
        Self {
            title: value.title,
            restaurant_name: value.restaurant_name,
            restaurant_link: value.restaurant_link,
            rating: value.rating,
            image1: value.image1,
            image2: value.image2,
            image3: value.image3,
            content: value.content,
        }
    }
}

/// Validate a payload, mapping field failures into a 400 with per-field
/// details so clients can redisplay the form.
fn validate_payload(payload: ReviewPayload) -> Result<ReviewDraft, ApiError> {
    ReviewDraft::validate(payload.into()).map_err(|err| field_errors(&err).into())
}

fn field_errors(err: &ReviewValidationError) -> DomainError {
    let fields: Vec<_> = err
        .fields()
        .iter()
        .map(|field| json!({ "field": field.field(), "code": field.code() }))
        .collect();
    DomainError::invalid_request("review fields failed validation")
        .with_details(json!({ "fields": fields }))
}

/// One review as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub title: String,
    pub restaurant_name: String,
    pub restaurant_link: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image3: Option<String>,
    pub content: String,
    /// The creating user; immutable for the life of the review.
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        let [image1, image2, image3] = review.images;
        Self {
            id: review.id.as_uuid(),
            title: review.title,
            restaurant_name: review.restaurant_name,
            restaurant_link: review.restaurant_link,
            rating: review.rating.value(),
            image1,
            image2,
            image3,
            content: review.content,
            author_id: review.author_id.as_uuid(),
            created_at: review.created_at,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// 1-based page number; defaults to the first page.
    pub page: Option<u32>,
}

/// Paginated global review listing, newest first.
#[utoipa::path(
    get,
    path = "/reviews",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of reviews", body = Object),
        (status = 400, description = "Invalid page number", body = ApiError),
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Page<ReviewResponse>>> {
    let page = state.reviews.list(query.page.unwrap_or(1)).await?;
    Ok(web::Json(page.map(ReviewResponse::from)))
}

/// Single review detail.
#[utoipa::path(
    get,
    path = "/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "The review", body = ReviewResponse),
        (status = 404, description = "No such review", body = ApiError),
    ),
    tags = ["reviews"],
    operation_id = "reviewDetail"
)]
#[get("/reviews/{review_id}")]
pub async fn review_detail(
    state: web::Data<HttpState>,
    review_id: web::Path<Uuid>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let review = state
        .reviews
        .get(ReviewId::from_uuid(review_id.into_inner()))
        .await?;
    Ok(web::Json(review.into()))
}

/// Create a review.
///
/// Requesters without a session or without a verified email are redirected
/// to the confirmation-required page; the review form is never reached.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = ReviewPayload,
    responses(
        (status = 303, description = "Created; Location points at the new review"),
        (status = 400, description = "Field validation failed", body = ApiError),
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReviewPayload>,
) -> ApiResult<HttpResponse> {
    let Some(author) = session.user_id()? else {
        return Ok(confirmation_required_redirect());
    };
    if !state.identity.is_verified(author).await? {
        return Ok(confirmation_required_redirect());
    }

    let draft = validate_payload(payload.into_inner())?;
    let review = state.reviews.create(author, draft).await?;
    Ok(see_other(&review_detail_path(review.id)))
}

/// Update a review's editable fields. Author only; the author is never
/// reassigned.
#[utoipa::path(
    put,
    path = "/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review identifier")),
    request_body = ReviewPayload,
    responses(
        (status = 303, description = "Updated; Location points at the review"),
        (status = 400, description = "Field validation failed", body = ApiError),
        (status = 401, description = "No session", body = ApiError),
        (status = 403, description = "Not the author", body = ApiError),
        (status = 404, description = "No such review", body = ApiError),
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[put("/reviews/{review_id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    review_id: web::Path<Uuid>,
    payload: web::Json<ReviewPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = ReviewId::from_uuid(review_id.into_inner());
    state.reviews.authorize_author(actor, id).await?;
    let draft = validate_payload(payload.into_inner())?;
    let review = state.reviews.update(actor, id, draft).await?;
    Ok(see_other(&review_detail_path(review.id)))
}

/// Delete a review permanently. Author only.
#[utoipa::path(
    delete,
    path = "/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review identifier")),
    responses(
        (status = 303, description = "Deleted; Location points at the listing"),
        (status = 401, description = "No session", body = ApiError),
        (status = 403, description = "Not the author", body = ApiError),
        (status = 404, description = "No such review", body = ApiError),
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{review_id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    review_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state
        .reviews
        .delete(actor, ReviewId::from_uuid(review_id.into_inner()))
        .await?;
    Ok(see_other(REVIEWS_PATH))
}
