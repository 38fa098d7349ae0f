//! Profile and per-user listing handlers.
//!
//! ```text
//! GET /users/{user_id}            profile with a 4-review preview
//! GET /users/{user_id}/reviews    all of one user's reviews, paginated
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{User, UserId};
use crate::inbound::http::reviews::{ListQuery, ReviewResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiError, ApiResult};

/// One user as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub nickname: String,
    pub joined_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_uuid(),
            nickname: user.nickname.to_string(),
            joined_at: user.created_at,
        }
    }
}

/// Profile page payload: the user plus a fixed-size recent-review preview.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    /// The user's newest reviews, at most four, independent of pagination.
    pub recent_reviews: Vec<ReviewResponse>,
}

/// Per-user listing payload: the resolved user plus one page of reviews.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewsResponse {
    pub user: UserResponse,
    #[schema(value_type = Object)]
    pub reviews: Page<ReviewResponse>,
}

/// Profile view: user record and their four most recent reviews.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "No such user", body = ApiError),
    ),
    tags = ["users"],
    operation_id = "profile"
)]
#[get("/users/{user_id}")]
pub async fn profile(
    state: web::Data<HttpState>,
    user_id: web::Path<Uuid>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state
        .profiles
        .profile(UserId::from_uuid(user_id.into_inner()))
        .await?;
    Ok(web::Json(ProfileResponse {
        user: profile.user.into(),
        recent_reviews: profile
            .recent_reviews
            .into_iter()
            .map(ReviewResponse::from)
            .collect(),
    }))
}

/// All of one user's reviews, newest first, paginated.
#[utoipa::path(
    get,
    path = "/users/{user_id}/reviews",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ListQuery,
    ),
    responses(
        (status = 200, description = "One page of the user's reviews", body = UserReviewsResponse),
        (status = 400, description = "Invalid page number", body = ApiError),
        (status = 404, description = "No such user", body = ApiError),
    ),
    tags = ["users"],
    operation_id = "userReviewList"
)]
#[get("/users/{user_id}/reviews")]
pub async fn user_review_list(
    state: web::Data<HttpState>,
    user_id: web::Path<Uuid>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<UserReviewsResponse>> {
    let listing = state
        .profiles
        .reviews_page(
            UserId::from_uuid(user_id.into_inner()),
            query.page.unwrap_or(1),
        )
        .await?;
    Ok(web::Json(UserReviewsResponse {
        user: listing.user.into(),
        reviews: listing.reviews.map(ReviewResponse::from),
    }))
}
