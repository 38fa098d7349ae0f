//! HTTP inbound adapter exposing the review service endpoints.

pub mod account;
pub mod error;
pub mod health;
pub mod reviews;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::{ApiError, ApiResult};

use actix_web::{http::header, HttpResponse};

/// A `303 See Other` redirect to `location`.
///
/// Mutations answer with redirects rather than entity bodies; the target is
/// the canonical page for the outcome (detail after create/update, listing
/// after delete).
#[must_use]
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
