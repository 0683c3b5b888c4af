use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::extract::Staff;
use super::responses::{self, RequestView};
use crate::portal::accounts::{AdminUserForm, UserId, UserQuery, UserUpdate};
use crate::portal::letters::{LetterRequestId, RequestStatus};
use crate::portal::repository::PortalStore;
use crate::portal::review::{NotificationQuery, RequestQuery};
use crate::portal::validation::{Choice, FieldErrors, INVALID_CHOICE};
use crate::portal::Portal;

const EXPORT_FILENAME: &str = "attachment; filename=\"permohonan-surat.csv\"";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StatusUpdate {
    status: String,
}

pub(crate) async fn requests<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Query(query): Query<RequestQuery>,
) -> Response
where
    S: PortalStore,
{
    match portal.review.requests(&query) {
        Ok(requests) => responses::ok(json!({
            "requests": responses::request_views(&requests),
        })),
        Err(err) => responses::review_error(err),
    }
}

pub(crate) async fn request<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Path(request_id): Path<u64>,
) -> Response
where
    S: PortalStore,
{
    match portal.review.request(LetterRequestId(request_id)) {
        Ok(request) => responses::ok(RequestView::from(&request)),
        Err(err) => responses::review_error(err),
    }
}

/// Only `status` is editable on a request.
pub(crate) async fn change_status<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Path(request_id): Path<u64>,
    Json(update): Json<StatusUpdate>,
) -> Response
where
    S: PortalStore,
{
    let Some(status) = RequestStatus::from_code(update.status.trim()) else {
        let mut errors = FieldErrors::new();
        errors.add("status", INVALID_CHOICE);
        return responses::invalid(&errors);
    };

    match portal
        .review
        .change_status(LetterRequestId(request_id), status)
    {
        Ok(change) => responses::ok(json!({
            "request": RequestView::from(&change.request),
            "notification": change.notification,
        })),
        Err(err) => responses::review_error(err),
    }
}

pub(crate) async fn export<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Query(query): Query<RequestQuery>,
) -> Response
where
    S: PortalStore,
{
    match portal.review.export_csv(&query) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, EXPORT_FILENAME),
            ],
            body,
        )
            .into_response(),
        Err(err) => responses::review_error(err),
    }
}

pub(crate) async fn notifications<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Query(query): Query<NotificationQuery>,
) -> Response
where
    S: PortalStore,
{
    match portal.review.notifications(&query) {
        Ok(entries) => responses::ok(json!({ "notifications": entries })),
        Err(err) => responses::review_error(err),
    }
}

pub(crate) async fn users<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Query(query): Query<UserQuery>,
) -> Response
where
    S: PortalStore,
{
    match portal.accounts.users(&query) {
        Ok(users) => responses::ok(json!({ "users": users })),
        Err(err) => responses::account_error(err),
    }
}

pub(crate) async fn add_user<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Json(form): Json<AdminUserForm>,
) -> Response
where
    S: PortalStore,
{
    match portal.accounts.add_user(&form) {
        Ok(user) => responses::created(user),
        Err(err) => responses::account_error(err),
    }
}

pub(crate) async fn update_user<S>(
    State(portal): State<Arc<Portal<S>>>,
    Staff(_): Staff,
    Path(user_id): Path<u64>,
    Json(update): Json<UserUpdate>,
) -> Response
where
    S: PortalStore,
{
    match portal.accounts.update_user(UserId(user_id), &update) {
        Ok(user) => responses::ok(user),
        Err(err) => responses::account_error(err),
    }
}
