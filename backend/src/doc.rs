//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and wire schema, plus the
//! session-cookie security scheme. The generated specification is exported
//! via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::inbound::http::account::{PasswordChangePayload, SignupPayload};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::reviews::{ReviewPayload, ReviewResponse};
use crate::inbound::http::users::{ProfileResponse, UserResponse, UserReviewsResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie established by the identity collaborator at login.",
            ))),
        );
    }
}

/// OpenAPI document for the review service.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::review_detail,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::user_review_list,
        crate::inbound::http::account::complete_signup,
        crate::inbound::http::account::change_password,
        crate::inbound::http::account::confirmation_required,
        crate::inbound::http::health::live,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        ReviewPayload,
        ReviewResponse,
        UserResponse,
        ProfileResponse,
        UserReviewsResponse,
        SignupPayload,
        PasswordChangePayload,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "reviews", description = "Review listing and lifecycle"),
        (name = "users", description = "Profiles and per-user listings"),
        (name = "account", description = "Signup completion and password change"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;
