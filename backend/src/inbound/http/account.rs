//! Account handlers: signup completion, password change, and the
//! confirmation-required landing page.
//!
//! ```text
//! POST /account/signup                 copy the signup nickname onto the user
//! POST /account/password               delegated password change
//! GET  /account/confirmation-required  soft-denial landing page
//! ```
//!
//! Signup and password mechanics belong to the identity collaborator; these
//! handlers only perform the one local step each flow needs and choose the
//! post-success redirect.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{DomainError, Nickname, PasswordChange};
use crate::inbound::http::reviews::REVIEWS_PATH;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{see_other, ApiError, ApiResult};

/// Destination for both unauthenticated and unverified creation attempts.
pub const CONFIRMATION_REQUIRED_PATH: &str = "/account/confirmation-required";

/// Signup completion form: the single custom field the review service owns.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub nickname: String,
}

/// Password change form; mechanics are delegated to the identity
/// collaborator.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangePayload {
    pub current_password: String,
    pub new_password: String,
}

/// Copy the validated nickname onto the requester's user record.
#[utoipa::path(
    post,
    path = "/account/signup",
    request_body = SignupPayload,
    responses(
        (status = 303, description = "Nickname saved; Location points at the profile"),
        (status = 400, description = "Invalid nickname", body = ApiError),
        (status = 401, description = "No session", body = ApiError),
    ),
    tags = ["account"],
    operation_id = "completeSignup"
)]
#[post("/account/signup")]
pub async fn complete_signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupPayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let nickname = Nickname::new(&payload.nickname).map_err(|err| {
        DomainError::invalid_request(err.to_string())
            .with_details(json!({ "fields": [{ "field": "nickname", "code": "invalid" }] }))
    })?;
    let user = state.profiles.complete_signup(actor, nickname).await?;
    Ok(see_other(&format!("/users/{}", user.id)))
}

/// Change the requester's password via the identity collaborator.
///
/// The only local behaviour is the post-success redirect back to the
/// review listing.
#[utoipa::path(
    post,
    path = "/account/password",
    request_body = PasswordChangePayload,
    responses(
        (status = 303, description = "Password changed; Location points at the listing"),
        (status = 400, description = "Invalid payload or wrong current password", body = ApiError),
        (status = 401, description = "No session", body = ApiError),
    ),
    tags = ["account"],
    operation_id = "changePassword"
)]
#[post("/account/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordChangePayload>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let change = PasswordChange::try_from_parts(&payload.current_password, &payload.new_password)
        .map_err(|err| {
        DomainError::invalid_request(err.to_string())
            .with_details(json!({ "fields": [{ "field": err.field(), "code": "invalid" }] }))
    })?;
    state.identity.change_password(actor, &change).await?;
    Ok(see_other(REVIEWS_PATH))
}

/// Landing page for creation attempts that need email confirmation first.
#[utoipa::path(
    get,
    path = "/account/confirmation-required",
    responses((status = 200, description = "Explanation payload")),
    tags = ["account"],
    operation_id = "confirmationRequired"
)]
#[get("/account/confirmation-required")]
pub async fn confirmation_required() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Confirm your email address before posting reviews.",
    }))
}
