//! JSON HTTP surface of the portal.
//!
//! Citizen routes live under `/api/v1/citizen`, staff routes under `/api/v1/admin`.
//! Clients authenticate with the bearer token returned by the login route.

mod admin;
mod auth;
mod citizen;
pub(crate) mod extract;
pub(crate) mod responses;

use std::sync::Arc;

use axum::{
    response::Response,
    routing::{get, post},
    Router,
};

use super::repository::PortalStore;
use super::Portal;
use extract::MaybeAuth;

pub mod paths {
    use crate::portal::letters::LetterType;
    use crate::portal::validation::Choice;

    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const DASHBOARD: &str = "/api/v1/citizen";
    pub const CHOOSE_LETTER: &str = "/api/v1/citizen/letters";
    pub const LETTER_FORM: &str = "/api/v1/citizen/letters/forms/:letter_type";
    pub const VERIFY: &str = "/api/v1/citizen/letters/verify";
    pub const PROCESSING: &str = "/api/v1/citizen/letters/processing";
    pub const SUCCESS: &str = "/api/v1/citizen/letters/success";
    pub const STATUS: &str = "/api/v1/citizen/status";
    pub const NOTIFICATIONS: &str = "/api/v1/citizen/notifications";
    pub const MARK_READ: &str = "/api/v1/citizen/notifications/:notification_id/read";
    pub const ADMIN_HOME: &str = "/api/v1/admin/requests";
    pub const ADMIN_REQUEST: &str = "/api/v1/admin/requests/:request_id";
    pub const ADMIN_EXPORT: &str = "/api/v1/admin/exports/requests.csv";
    pub const ADMIN_NOTIFICATIONS: &str = "/api/v1/admin/notifications";
    pub const ADMIN_USERS: &str = "/api/v1/admin/users";
    pub const ADMIN_USER: &str = "/api/v1/admin/users/:user_id";

    /// Concrete form path for one letter type.
    pub fn letter_form(letter_type: LetterType) -> String {
        format!("{CHOOSE_LETTER}/forms/{}", letter_type.code())
    }
}

/// Router exposing the citizen wizard, the staff review surface and the auth routes.
pub fn portal_router<S>(portal: Arc<Portal<S>>) -> Router
where
    S: PortalStore,
{
    Router::new()
        .route("/", get(landing::<S>))
        .route(paths::REGISTER, post(auth::register::<S>))
        .route(paths::LOGIN, post(auth::login::<S>))
        .route(paths::LOGOUT, post(auth::logout::<S>))
        .route(paths::DASHBOARD, get(citizen::dashboard::<S>))
        .route(
            paths::CHOOSE_LETTER,
            get(citizen::letter_types::<S>).post(citizen::choose_type::<S>),
        )
        .route(
            paths::LETTER_FORM,
            get(citizen::letter_form::<S>).post(citizen::fill_letter::<S>),
        )
        .route(
            paths::VERIFY,
            get(citizen::verification::<S>).post(citizen::verify::<S>),
        )
        .route(paths::PROCESSING, get(citizen::last_request::<S>))
        .route(paths::SUCCESS, get(citizen::last_request::<S>))
        .route(paths::STATUS, get(citizen::status::<S>))
        .route(paths::NOTIFICATIONS, get(citizen::notifications::<S>))
        .route(paths::MARK_READ, post(citizen::mark_read::<S>))
        .route(paths::ADMIN_HOME, get(admin::requests::<S>))
        .route(
            paths::ADMIN_REQUEST,
            get(admin::request::<S>).patch(admin::change_status::<S>),
        )
        .route(paths::ADMIN_EXPORT, get(admin::export::<S>))
        .route(paths::ADMIN_NOTIFICATIONS, get(admin::notifications::<S>))
        .route(
            paths::ADMIN_USERS,
            get(admin::users::<S>).post(admin::add_user::<S>),
        )
        .route(paths::ADMIN_USER, axum::routing::patch(admin::update_user::<S>))
        .with_state(portal)
}

/// Staff land on the review queue, citizens on their dashboard, everyone else on login.
pub(crate) async fn landing<S>(MaybeAuth(auth): MaybeAuth) -> Response
where
    S: PortalStore,
{
    let target = match auth {
        Some(auth) if auth.user.is_staff => paths::ADMIN_HOME,
        Some(_) => paths::DASHBOARD,
        None => paths::LOGIN,
    };
    responses::see_other(target)
}
