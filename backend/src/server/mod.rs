//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{web, App};

use coplate::inbound::http::account::{change_password, complete_signup, confirmation_required};
use coplate::inbound::http::health::{live, ready, HealthState};
use coplate::inbound::http::reviews::{
    create_review, delete_review, list_reviews, review_detail, update_review,
};
use coplate::inbound::http::state::HttpState;
use coplate::inbound::http::users::{profile, user_review_list};
use coplate::Trace;

/// Assemble the application: trace and cookie-session middleware on every
/// route, probes registered ahead of the review-service routes.
pub fn build_app(
    config: &ServerConfig,
    state: HttpState,
    health: web::Data<HealthState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), config.key.clone())
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(config.same_site)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .app_data(health)
        .wrap(session)
        .wrap(Trace)
        .service(ready)
        .service(live)
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
