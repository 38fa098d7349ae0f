//! Diesel-backed persistence adapters.

mod diesel_identity_service;
mod diesel_review_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_identity_service::{password_digest, DieselIdentityService};
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
