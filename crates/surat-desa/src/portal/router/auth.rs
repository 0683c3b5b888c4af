use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::extract::{Authenticated, MaybeAuth};
use super::{paths, responses};
use crate::portal::accounts::{LoginForm, RegistrationForm};
use crate::portal::repository::PortalStore;
use crate::portal::Portal;

pub(crate) async fn register<S>(
    State(portal): State<Arc<Portal<S>>>,
    MaybeAuth(auth): MaybeAuth,
    Json(form): Json<RegistrationForm>,
) -> Response
where
    S: PortalStore,
{
    match auth {
        Some(auth) if auth.user.is_staff => return responses::see_other(paths::ADMIN_HOME),
        Some(_) => return responses::see_other(paths::DASHBOARD),
        None => {}
    }

    match portal.accounts.register(&form) {
        Ok(user) => responses::created(json!({
            "user": user,
            "message": "Registrasi berhasil. Silahkan login.",
            "login": paths::LOGIN,
        })),
        Err(err) => responses::account_error(err),
    }
}

pub(crate) async fn login<S>(
    State(portal): State<Arc<Portal<S>>>,
    Json(form): Json<LoginForm>,
) -> Response
where
    S: PortalStore,
{
    match portal.accounts.login(&form) {
        Ok(grant) => {
            let home = if grant.user.is_staff {
                paths::ADMIN_HOME
            } else {
                paths::DASHBOARD
            };
            responses::ok(json!({
                "token": grant.token,
                "user": grant.user,
                "home": home,
            }))
        }
        Err(err) => responses::account_error(err),
    }
}

pub(crate) async fn logout<S>(
    State(portal): State<Arc<Portal<S>>>,
    Authenticated(auth): Authenticated,
) -> Response
where
    S: PortalStore,
{
    match portal.accounts.logout(&auth.token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => responses::account_error(err),
    }
}
