use super::accounts::{Nik, User, UserDraft, UserId};
use super::letters::{
    LetterRequest, LetterRequestDraft, LetterRequestId, Notification, NotificationDraft,
};
use super::session::{Session, SessionToken};

/// Account storage. NIKs are unique across accounts.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, draft: UserDraft) -> Result<User, RepositoryError>;
    fn update_user(&self, user: User) -> Result<(), RepositoryError>;
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_nik(&self, nik: &Nik) -> Result<Option<User>, RepositoryError>;
    fn users(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Letter request storage; the repository stamps ids and timestamps.
pub trait LetterRepository: Send + Sync {
    fn insert_request(&self, draft: LetterRequestDraft) -> Result<LetterRequest, RepositoryError>;
    fn update_request(&self, request: LetterRequest) -> Result<LetterRequest, RepositoryError>;
    fn request(&self, id: LetterRequestId) -> Result<Option<LetterRequest>, RepositoryError>;
    fn requests(&self) -> Result<Vec<LetterRequest>, RepositoryError>;
    fn requests_for(&self, user: UserId) -> Result<Vec<LetterRequest>, RepositoryError>;
}

pub trait NotificationRepository: Send + Sync {
    fn insert_notification(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, RepositoryError>;
    fn update_notification(&self, notification: Notification) -> Result<(), RepositoryError>;
    fn notifications(&self) -> Result<Vec<Notification>, RepositoryError>;
    fn notifications_for(&self, user: UserId) -> Result<Vec<Notification>, RepositoryError>;
}

/// Server-side session state keyed by the bearer token handed out at login.
pub trait SessionStore: Send + Sync {
    fn create_session(&self, user: UserId) -> Result<SessionToken, RepositoryError>;
    fn session(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError>;
    fn save_session(&self, token: &SessionToken, session: Session) -> Result<(), RepositoryError>;
    fn delete_session(&self, token: &SessionToken) -> Result<(), RepositoryError>;
}

/// Everything the portal router needs from one backing store.
pub trait PortalStore:
    UserRepository + LetterRepository + NotificationRepository + SessionStore + 'static
{
}

impl<T> PortalStore for T where
    T: UserRepository + LetterRepository + NotificationRepository + SessionStore + 'static
{
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
