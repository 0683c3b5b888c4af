use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::extract::Citizen;
use super::paths;
use super::responses::{self, RequestView};
use crate::portal::letters::{LetterFormData, NotificationId, VerificationData};
use crate::portal::repository::PortalStore;
use crate::portal::submission::SubmissionError;
use crate::portal::validation::{FieldErrors, INVALID_CHOICE};
use crate::portal::Portal;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChooseLetter {
    letter_type: String,
}

pub(crate) async fn dashboard<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.dashboard(&auth) {
        Ok(view) => responses::ok(view),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn letter_types<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    responses::ok(json!({
        "choices": portal.submissions.letter_types(),
        "selected": auth.session.letter_type,
    }))
}

pub(crate) async fn choose_type<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(mut auth): Citizen,
    Json(choice): Json<ChooseLetter>,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.choose_type(&mut auth, &choice.letter_type) {
        Ok(letter_type) => responses::see_other(&paths::letter_form(letter_type)),
        Err(SubmissionError::UnknownLetterType(raw)) => {
            debug!(letter_type = %raw, "unknown letter type chosen");
            let mut errors = FieldErrors::new();
            errors.add("letter_type", INVALID_CHOICE);
            let payload = json!({
                "errors": errors,
                "choices": portal.submissions.letter_types(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn letter_form<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
    Path(letter_type): Path<String>,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.form(&auth, &letter_type) {
        Ok(view) => responses::ok(view),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn fill_letter<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(mut auth): Citizen,
    Path(letter_type): Path<String>,
    Json(data): Json<LetterFormData>,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.fill(&mut auth, &letter_type, &data) {
        Ok(_) => responses::see_other(paths::VERIFY),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn verification<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.verification(&auth) {
        Ok(view) => responses::ok(view),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn verify<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(mut auth): Citizen,
    Json(data): Json<VerificationData>,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.verify(&mut auth, &data) {
        Ok(_) => responses::see_other(paths::PROCESSING),
        Err(err) => responses::submission_error(err),
    }
}

/// Backs both the processing and the success page.
pub(crate) async fn last_request<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.last_request(&auth) {
        Ok(request) => responses::ok(RequestView::from(&request)),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn status<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.history(&auth) {
        Ok(requests) => responses::ok(json!({
            "requests": responses::request_views(&requests),
        })),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn notifications<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
) -> Response
where
    S: PortalStore,
{
    match portal.submissions.notifications(&auth) {
        Ok(notifications) => responses::ok(json!({ "notifications": notifications })),
        Err(err) => responses::submission_error(err),
    }
}

pub(crate) async fn mark_read<S>(
    State(portal): State<Arc<Portal<S>>>,
    Citizen(auth): Citizen,
    Path(notification_id): Path<u64>,
) -> Response
where
    S: PortalStore,
{
    match portal
        .submissions
        .mark_read(&auth, NotificationId(notification_id))
    {
        Ok(notification) => responses::ok(notification),
        Err(err) => responses::submission_error(err),
    }
}
