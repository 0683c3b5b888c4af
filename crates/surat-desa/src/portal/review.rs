//! Staff-side review of letter requests.
//!
//! Status changes are the only source of citizen notifications: approving a request
//! tells the citizen to come collect it, marking it collected closes the loop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::accounts::User;
use super::letters::{
    LetterRequest, LetterRequestId, LetterType, Notification, NotificationDraft, RequestStatus,
};
use super::repository::{LetterRepository, NotificationRepository, RepositoryError, UserRepository};
use super::validation::Choice;

pub const APPROVED_TITLE: &str = "Surat Disetujui";
pub const APPROVED_MESSAGE: &str = "Surat kamu telah disetujui. Silahkan datang ke kantor desa untuk mengambil surat. Harap membawa KTP atau KK sebagai bukti pengambilan.";
pub const COLLECTED_TITLE: &str = "Surat Telah Diambil";

const CSV_HEADER: [&str; 8] = [
    "id",
    "nik",
    "nama",
    "jenis_surat",
    "status",
    "alamat",
    "created_at",
    "updated_at",
];

/// Filters for the staff request listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestQuery {
    pub q: Option<String>,
    pub letter_type: Option<LetterType>,
    pub status: Option<RequestStatus>,
}

impl RequestQuery {
    fn matches(&self, request: &LetterRequest) -> bool {
        if self.letter_type.is_some_and(|kind| kind != request.letter_type) {
            return false;
        }
        if self.status.is_some_and(|status| status != request.status) {
            return false;
        }
        match needle(&self.q) {
            Some(needle) => [request.nik.as_str(), request.nama.as_str()]
                .into_iter()
                .any(|value| value.to_lowercase().contains(&needle)),
            None => true,
        }
    }
}

/// Filters for the staff notification listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationQuery {
    pub q: Option<String>,
    pub is_read: Option<bool>,
}

/// Notification joined with the account it was sent to.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEntry {
    #[serde(flatten)]
    pub notification: Notification,
    pub user_nik: Option<String>,
    pub user_nama: Option<String>,
}

/// Result of a status change; `notification` is set when the change told the citizen.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub request: LetterRequest,
    pub notification: Option<Notification>,
}

/// Service used by village staff to list, decide on and export letter requests.
pub struct ReviewService<S> {
    store: Arc<S>,
}

impl<S> ReviewService<S>
where
    S: LetterRepository + NotificationRepository + UserRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All requests matching `query`, newest first.
    pub fn requests(&self, query: &RequestQuery) -> Result<Vec<LetterRequest>, ReviewError> {
        let mut requests: Vec<LetterRequest> = self
            .store
            .requests()?
            .into_iter()
            .filter(|request| query.matches(request))
            .collect();
        requests.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right.id.cmp(&left.id))
        });
        Ok(requests)
    }

    pub fn request(&self, id: LetterRequestId) -> Result<LetterRequest, ReviewError> {
        Ok(self.store.request(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Apply a new status. Moving into `DISETUJUI` or `TELAH_DIAMBIL` notifies the
    /// citizen; saving the status a request already has only stamps `updated_at`.
    pub fn change_status(
        &self,
        id: LetterRequestId,
        status: RequestStatus,
    ) -> Result<StatusChange, ReviewError> {
        let mut request = self.request(id)?;
        let previous = request.status;

        request.status = status;
        let request = self.store.update_request(request)?;
        if previous == status {
            return Ok(StatusChange {
                request,
                notification: None,
            });
        }
        info!(
            request_id = request.id.0,
            from = %previous,
            to = %status,
            "letter request status changed"
        );

        let notification = match status_notification(&request) {
            Some(draft) => {
                let notification = self.store.insert_notification(draft)?;
                info!(
                    notification_id = notification.id.0,
                    user_id = notification.user_id.0,
                    title = %notification.title,
                    "citizen notified"
                );
                Some(notification)
            }
            None => None,
        };

        Ok(StatusChange {
            request,
            notification,
        })
    }

    /// All notifications matching `query`, newest first.
    pub fn notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<Vec<NotificationEntry>, ReviewError> {
        let mut entries = Vec::new();
        for notification in self.store.notifications()? {
            if query.is_read.is_some_and(|flag| flag != notification.is_read) {
                continue;
            }
            let user = self.store.user(notification.user_id)?;
            if let Some(needle) = needle(&query.q) {
                if !notification_matches(&notification, user.as_ref(), &needle) {
                    continue;
                }
            }
            entries.push(NotificationEntry {
                user_nik: user.as_ref().map(|user| user.nik.to_string()),
                user_nama: user.map(|user| user.nama),
                notification,
            });
        }
        entries.sort_by(|left, right| {
            right
                .notification
                .created_at
                .cmp(&left.notification.created_at)
                .then(right.notification.id.cmp(&left.notification.id))
        });
        Ok(entries)
    }

    /// CSV dump of the filtered listing, same order as [`ReviewService::requests`].
    pub fn export_csv(&self, query: &RequestQuery) -> Result<String, ReviewError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for request in self.requests(query)? {
            writer.write_record([
                request.id.0.to_string(),
                request.nik.to_string(),
                request.nama.clone(),
                request.letter_label().to_string(),
                request.status_label().to_string(),
                request.alamat.clone(),
                request.created_at.to_rfc3339(),
                request.updated_at.to_rfc3339(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ReviewError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| ReviewError::Export(err.to_string()))
    }
}

fn status_notification(request: &LetterRequest) -> Option<NotificationDraft> {
    let (title, message) = match request.status {
        RequestStatus::Disetujui => (APPROVED_TITLE.to_string(), APPROVED_MESSAGE.to_string()),
        RequestStatus::TelahDiambil => (
            COLLECTED_TITLE.to_string(),
            format!("{} - Telah Diambil.", request.letter_type.label()),
        ),
        RequestStatus::Diproses | RequestStatus::Ditolak => return None,
    };
    Some(NotificationDraft {
        user_id: request.user_id,
        title,
        message,
    })
}

fn notification_matches(notification: &Notification, user: Option<&User>, needle: &str) -> bool {
    let account = user
        .map(|user| [user.nik.as_str(), user.nama.as_str()])
        .unwrap_or_default();
    account
        .into_iter()
        .chain([notification.title.as_str(), notification.message.as_str()])
        .any(|value| value.to_lowercase().contains(needle))
}

fn needle(q: &Option<String>) -> Option<String> {
    q.as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Export(String),
}
