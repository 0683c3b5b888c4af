use std::fmt::Display;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::paths;
use crate::portal::accounts::AccountError;
use crate::portal::letters::LetterRequest;
use crate::portal::repository::RepositoryError;
use crate::portal::review::ReviewError;
use crate::portal::submission::SubmissionError;
use crate::portal::validation::FieldErrors;

/// A letter request with its human-readable type and status.
#[derive(Debug, Serialize)]
pub(crate) struct RequestView<'a> {
    #[serde(flatten)]
    request: &'a LetterRequest,
    letter_label: &'static str,
    status_label: &'static str,
}

impl<'a> From<&'a LetterRequest> for RequestView<'a> {
    fn from(request: &'a LetterRequest) -> Self {
        Self {
            request,
            letter_label: request.letter_label(),
            status_label: request.status_label(),
        }
    }
}

pub(crate) fn request_views(requests: &[LetterRequest]) -> Vec<RequestView<'_>> {
    requests.iter().map(RequestView::from).collect()
}

/// 303 to `path`; how every "go back a step" transition is expressed.
pub(crate) fn see_other(path: &str) -> Response {
    Redirect::to(path).into_response()
}

pub(crate) fn ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) fn created<T: Serialize>(body: T) -> Response {
    (StatusCode::CREATED, Json(body)).into_response()
}

pub(crate) fn invalid(errors: &FieldErrors) -> Response {
    let payload = json!({ "errors": errors });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

pub(crate) fn unauthorized() -> Response {
    let payload = json!({ "error": "login required", "login": paths::LOGIN });
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(payload),
    )
        .into_response()
}

pub(crate) fn forbidden() -> Response {
    let payload = json!({ "error": "staff access required" });
    (StatusCode::FORBIDDEN, Json(payload)).into_response()
}

pub(crate) fn not_found() -> Response {
    let payload = json!({ "error": "not found" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

pub(crate) fn internal(err: &dyn Display) -> Response {
    error!(error = %err, "portal request failed");
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) fn repository_error(err: RepositoryError) -> Response {
    match err {
        RepositoryError::NotFound => not_found(),
        RepositoryError::Conflict => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => internal(&other),
    }
}

pub(crate) fn account_error(err: AccountError) -> Response {
    match err {
        AccountError::Invalid(errors) => invalid(&errors),
        AccountError::MissingNik | AccountError::InvalidNik(_) => {
            let mut errors = FieldErrors::new();
            errors.add("nik", err.to_string());
            invalid(&errors)
        }
        AccountError::InvalidCredentials => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        AccountError::PasswordHash(_) => internal(&err),
        AccountError::Repository(err) => repository_error(err),
    }
}

/// Wizard errors: a broken wizard sends the citizen back to the step that can repair it.
pub(crate) fn submission_error(err: SubmissionError) -> Response {
    match err {
        SubmissionError::UnknownLetterType(_) | SubmissionError::MissingDraft => {
            see_other(paths::CHOOSE_LETTER)
        }
        SubmissionError::NoRecentRequest => see_other(paths::DASHBOARD),
        SubmissionError::Invalid(errors) => invalid(&errors),
        SubmissionError::Repository(err) => repository_error(err),
    }
}

pub(crate) fn review_error(err: ReviewError) -> Response {
    match err {
        ReviewError::Repository(err) => repository_error(err),
        other => internal(&other),
    }
}
