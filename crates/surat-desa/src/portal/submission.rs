//! The citizen-side request wizard: pick a letter type, fill its form, verify, submit.
//!
//! Wizard state lives in the login session, so every step that advances the wizard
//! writes the session back before returning.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::letters::{
    FieldSpec, LetterForm, LetterFormData, LetterRequest, LetterRequestDraft, LetterType,
    Notification, NotificationId, RequestStatus, VerificationData, VerificationForm,
};
use super::repository::{LetterRepository, NotificationRepository, RepositoryError, SessionStore};
use super::session::AuthSession;
use super::validation::{self, Choice, ChoiceView, FieldErrors};

/// Service driving the multi-step letter request flow for one citizen session.
pub struct SubmissionService<S> {
    store: Arc<S>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub nik: String,
    pub nama: String,
    pub open_requests: usize,
    pub unread_notifications: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LetterFormView {
    pub letter_type: LetterType,
    pub letter_label: &'static str,
    pub fields: Vec<FieldSpec>,
    pub initial: LetterFormData,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationView {
    pub letter_type: LetterType,
    pub letter_label: &'static str,
    pub initial: VerificationData,
    pub letter_type_locked: bool,
}

impl<S> SubmissionService<S>
where
    S: LetterRepository + NotificationRepository + SessionStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn letter_types(&self) -> Vec<ChoiceView> {
        validation::choices::<LetterType>()
    }

    pub fn dashboard(&self, auth: &AuthSession) -> Result<DashboardView, SubmissionError> {
        let open_requests = self
            .store
            .requests_for(auth.user.id)?
            .iter()
            .filter(|request| {
                matches!(
                    request.status,
                    RequestStatus::Diproses | RequestStatus::Disetujui
                )
            })
            .count();
        let unread_notifications = self
            .store
            .notifications_for(auth.user.id)?
            .iter()
            .filter(|notification| !notification.is_read)
            .count();

        Ok(DashboardView {
            nik: auth.user.nik.to_string(),
            nama: auth.user.nama.clone(),
            open_requests,
            unread_notifications,
        })
    }

    /// Step 1: remember the chosen letter type.
    pub fn choose_type(
        &self,
        auth: &mut AuthSession,
        raw: &str,
    ) -> Result<LetterType, SubmissionError> {
        let letter_type = parse_letter_type(raw)?;
        auth.session.letter_type = Some(letter_type);
        self.store.save_session(&auth.token, auth.session.clone())?;
        Ok(letter_type)
    }

    /// Step 2: the empty form, pre-filled with the account's name and NIK.
    pub fn form(&self, auth: &AuthSession, raw: &str) -> Result<LetterFormView, SubmissionError> {
        let letter_type = parse_letter_type(raw)?;
        let form = LetterForm::new(letter_type, Some(&auth.user));
        Ok(LetterFormView {
            letter_type,
            letter_label: letter_type.label(),
            fields: form.fields(),
            initial: form.initial(),
        })
    }

    /// Step 3: validate the letter form and park the payload in the session.
    pub fn fill(
        &self,
        auth: &mut AuthSession,
        raw: &str,
        data: &LetterFormData,
    ) -> Result<LetterType, SubmissionError> {
        let letter_type = parse_letter_type(raw)?;
        let details = LetterForm::new(letter_type, Some(&auth.user)).validate(data)?;

        auth.session.letter_type = Some(letter_type);
        auth.session.draft = Some(details.to_payload());
        self.store.save_session(&auth.token, auth.session.clone())?;
        Ok(letter_type)
    }

    /// Step 4: the verification form, pre-filled from the account and the draft.
    pub fn verification(&self, auth: &AuthSession) -> Result<VerificationView, SubmissionError> {
        let (letter_type, draft) = pending_draft(auth)?;
        let alamat = draft
            .get("alamat")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(VerificationView {
            letter_type,
            letter_label: letter_type.label(),
            initial: VerificationData {
                nama: auth.user.nama.clone(),
                nik: auth.user.nik.to_string(),
                alamat,
                jenis_surat: letter_type.code().to_string(),
            },
            letter_type_locked: true,
        })
    }

    /// Step 5: confirm identity and persist the request as `DIPROSES`.
    pub fn verify(
        &self,
        auth: &mut AuthSession,
        data: &VerificationData,
    ) -> Result<LetterRequest, SubmissionError> {
        let (letter_type, draft) = pending_draft(auth)?;
        let verified = VerificationForm::new(Some(&auth.user), letter_type).validate(data)?;

        let request = self.store.insert_request(LetterRequestDraft {
            user_id: auth.user.id,
            letter_type: verified.letter_type,
            nama: verified.nama,
            nik: verified.nik,
            alamat: verified.alamat,
            payload: draft.clone(),
        })?;

        auth.session.last_request_id = Some(request.id);
        self.store.save_session(&auth.token, auth.session.clone())?;

        info!(
            request_id = request.id.0,
            user_id = auth.user.id.0,
            letter_type = %request.letter_type,
            "letter request submitted"
        );
        Ok(request)
    }

    /// Step 6: the request submitted last in this session.
    pub fn last_request(&self, auth: &AuthSession) -> Result<LetterRequest, SubmissionError> {
        let id = auth
            .session
            .last_request_id
            .ok_or(SubmissionError::NoRecentRequest)?;
        match self.store.request(id)? {
            Some(request) if request.user_id == auth.user.id => Ok(request),
            _ => Err(RepositoryError::NotFound.into()),
        }
    }

    /// The citizen's own requests, newest first.
    pub fn history(&self, auth: &AuthSession) -> Result<Vec<LetterRequest>, SubmissionError> {
        let mut requests = self.store.requests_for(auth.user.id)?;
        requests.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right.id.cmp(&left.id))
        });
        Ok(requests)
    }

    /// The citizen's own notifications, newest first.
    pub fn notifications(&self, auth: &AuthSession) -> Result<Vec<Notification>, SubmissionError> {
        let mut notifications = self.store.notifications_for(auth.user.id)?;
        notifications.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right.id.cmp(&left.id))
        });
        Ok(notifications)
    }

    pub fn mark_read(
        &self,
        auth: &AuthSession,
        id: NotificationId,
    ) -> Result<Notification, SubmissionError> {
        let mut notification = self
            .store
            .notifications_for(auth.user.id)?
            .into_iter()
            .find(|notification| notification.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if !notification.is_read {
            notification.is_read = true;
            self.store.update_notification(notification.clone())?;
        }
        Ok(notification)
    }
}

fn parse_letter_type(raw: &str) -> Result<LetterType, SubmissionError> {
    LetterType::from_code(raw.trim())
        .ok_or_else(|| SubmissionError::UnknownLetterType(raw.to_string()))
}

fn pending_draft(auth: &AuthSession) -> Result<(LetterType, &serde_json::Value), SubmissionError> {
    match (auth.session.letter_type, auth.session.draft.as_ref()) {
        (Some(letter_type), Some(draft)) => Ok((letter_type, draft)),
        _ => Err(SubmissionError::MissingDraft),
    }
}

/// Error raised by the submission wizard.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("unknown letter type '{0}'")]
    UnknownLetterType(String),
    #[error("no letter draft in this session")]
    MissingDraft,
    #[error("no request submitted in this session")]
    NoRecentRequest,
    #[error("invalid form: {0}")]
    Invalid(#[from] FieldErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
