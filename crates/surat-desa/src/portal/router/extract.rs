//! Session extractors. Every protected handler names the role it serves and the
//! extractor turns everyone else away before the handler runs.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::Response,
};

use super::{paths, responses};
use crate::portal::repository::PortalStore;
use crate::portal::session::{AuthSession, SessionToken};
use crate::portal::Portal;

/// Any logged-in account.
pub(crate) struct Authenticated(pub AuthSession);

/// A logged-in non-staff account. Staff are redirected to the admin surface.
pub(crate) struct Citizen(pub AuthSession);

/// A logged-in staff account. Citizens get 403.
pub(crate) struct Staff(pub AuthSession);

/// The session when a valid token is present, `None` otherwise.
pub(crate) struct MaybeAuth(pub Option<AuthSession>);

pub(crate) fn bearer_token(parts: &Parts) -> Option<SessionToken> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SessionToken(token.to_string()))
}

fn resolve<S: PortalStore>(
    parts: &Parts,
    portal: &Portal<S>,
) -> Result<Option<AuthSession>, Response> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    portal
        .accounts
        .resolve(&token)
        .map_err(responses::account_error)
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<Portal<S>>> for MaybeAuth
where
    S: PortalStore,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<Portal<S>>,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, portal).map(MaybeAuth)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<Portal<S>>> for Authenticated
where
    S: PortalStore,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<Portal<S>>,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, portal)?
            .map(Authenticated)
            .ok_or_else(responses::unauthorized)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<Portal<S>>> for Citizen
where
    S: PortalStore,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<Portal<S>>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, portal)? {
            Some(auth) if auth.user.is_staff => Err(responses::see_other(paths::ADMIN_HOME)),
            Some(auth) => Ok(Citizen(auth)),
            None => Err(responses::unauthorized()),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<Arc<Portal<S>>> for Staff
where
    S: PortalStore,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        portal: &Arc<Portal<S>>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, portal)? {
            Some(auth) if auth.user.is_staff => Ok(Staff(auth)),
            Some(_) => Err(responses::forbidden()),
            None => Err(responses::unauthorized()),
        }
    }
}
