//! PostgreSQL-backed `IdentityService` adapter.
//!
//! The identity collaborator owns signup, login, and confirmation mail; the
//! review service shares its tables. This adapter reads the one fact the
//! domain needs (a verified email exists) and performs the password-change
//! passthrough against the stored digest.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::IdentityService;
use crate::domain::{DomainError, PasswordChange, UserId};

use super::pool::{DbPool, PoolError};
use super::schema::{email_addresses, users};

/// Diesel-backed implementation of the `IdentityService` port.
#[derive(Clone)]
pub struct DieselIdentityService {
    pool: DbPool,
}

impl DieselIdentityService {
    /// Create a new adapter with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Hex-encoded SHA-256 digest matching the collaborator's stored format.
#[must_use]
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn map_pool_error(error: PoolError) -> DomainError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DomainError::service_unavailable(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> DomainError {
    debug!(error = %error, "diesel operation failed");
    DomainError::internal("database error")
}

fn wrong_current_password() -> DomainError {
    DomainError::invalid_request("current password does not match").with_details(json!({
        "fields": [{ "field": "currentPassword", "code": "mismatch" }]
    }))
}

#[async_trait]
impl IdentityService for DieselIdentityService {
    async fn is_verified(&self, user: UserId) -> Result<bool, DomainError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            email_addresses::table
                .filter(email_addresses::user_id.eq(user.as_uuid()))
                .filter(email_addresses::verified.eq(true)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn change_password(
        &self,
        user: UserId,
        change: &PasswordChange,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<String> = users::table
            .find(user.as_uuid())
            .select(users::password_digest)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(stored) = stored else {
            return Err(DomainError::not_found("user not found"));
        };

        if stored != password_digest(change.current()) {
            return Err(wrong_current_password());
        }

        diesel::update(users::table.find(user.as_uuid()))
            .set((
                users::password_digest.eq(password_digest(change.new_password())),
                users::updated_at.eq(chrono::Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
