//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain services and ports, keeping them testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityService, ReviewRepository, UserRepository};
use crate::domain::{ProfileService, ReviewService};

/// Parameter object bundling the services and ports handlers use.
#[derive(Clone)]
pub struct HttpState {
    pub reviews: ReviewService,
    pub profiles: ProfileService,
    pub identity: Arc<dyn IdentityService>,
}

impl HttpState {
    /// Wire handler state from port implementations.
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityService>,
    ) -> Self {
        Self {
            reviews: ReviewService::new(reviews.clone()),
            profiles: ProfileService::new(users, reviews),
            identity,
        }
    }
}
