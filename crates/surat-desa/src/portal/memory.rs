use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::accounts::{Nik, User, UserDraft, UserId};
use super::letters::{
    LetterRequest, LetterRequestDraft, LetterRequestId, Notification, NotificationDraft,
    NotificationId, RequestStatus,
};
use super::repository::{
    LetterRepository, NotificationRepository, RepositoryError, SessionStore, UserRepository,
};
use super::session::{Session, SessionToken};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    requests: BTreeMap<LetterRequestId, LetterRequest>,
    notifications: BTreeMap<NotificationId, Notification>,
    sessions: HashMap<SessionToken, Session>,
    next_user: u64,
    next_request: u64,
    next_notification: u64,
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// Process-local store backing every portal repository; cloning shares the tables.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.tables.lock().expect("store mutex poisoned");
        f(&mut guard)
    }
}

impl UserRepository for InMemoryStore {
    fn insert_user(&self, draft: UserDraft) -> Result<User, RepositoryError> {
        self.with(|tables| {
            if tables.users.values().any(|user| user.nik == draft.nik) {
                return Err(RepositoryError::Conflict);
            }
            let user = User {
                id: UserId(next_id(&mut tables.next_user)),
                nik: draft.nik,
                nama: draft.nama,
                no_wa: draft.no_wa,
                email: draft.email,
                password_hash: draft.password_hash,
                is_active: draft.is_active,
                is_staff: draft.is_staff,
                is_superuser: draft.is_superuser,
                last_login: None,
                date_joined: Utc::now(),
            };
            tables.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        self.with(|tables| match tables.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.with(|tables| tables.users.get(&id).cloned()))
    }

    fn user_by_nik(&self, nik: &Nik) -> Result<Option<User>, RepositoryError> {
        Ok(self.with(|tables| tables.users.values().find(|user| &user.nik == nik).cloned()))
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.with(|tables| tables.users.values().cloned().collect()))
    }
}

impl LetterRepository for InMemoryStore {
    fn insert_request(&self, draft: LetterRequestDraft) -> Result<LetterRequest, RepositoryError> {
        self.with(|tables| {
            let now = Utc::now();
            let request = LetterRequest {
                id: LetterRequestId(next_id(&mut tables.next_request)),
                user_id: draft.user_id,
                letter_type: draft.letter_type,
                status: RequestStatus::Diproses,
                nama: draft.nama,
                nik: draft.nik,
                alamat: draft.alamat,
                payload: draft.payload,
                created_at: now,
                updated_at: now,
            };
            tables.requests.insert(request.id, request.clone());
            Ok(request)
        })
    }

    fn update_request(&self, mut request: LetterRequest) -> Result<LetterRequest, RepositoryError> {
        self.with(|tables| match tables.requests.get_mut(&request.id) {
            Some(slot) => {
                request.updated_at = Utc::now();
                *slot = request.clone();
                Ok(request)
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn request(&self, id: LetterRequestId) -> Result<Option<LetterRequest>, RepositoryError> {
        Ok(self.with(|tables| tables.requests.get(&id).cloned()))
    }

    fn requests(&self) -> Result<Vec<LetterRequest>, RepositoryError> {
        Ok(self.with(|tables| tables.requests.values().cloned().collect()))
    }

    fn requests_for(&self, user: UserId) -> Result<Vec<LetterRequest>, RepositoryError> {
        Ok(self.with(|tables| {
            tables
                .requests
                .values()
                .filter(|request| request.user_id == user)
                .cloned()
                .collect()
        }))
    }
}

impl NotificationRepository for InMemoryStore {
    fn insert_notification(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, RepositoryError> {
        self.with(|tables| {
            let notification = Notification {
                id: NotificationId(next_id(&mut tables.next_notification)),
                user_id: draft.user_id,
                title: draft.title,
                message: draft.message,
                created_at: Utc::now(),
                is_read: false,
            };
            tables
                .notifications
                .insert(notification.id, notification.clone());
            Ok(notification)
        })
    }

    fn update_notification(&self, notification: Notification) -> Result<(), RepositoryError> {
        self.with(|tables| match tables.notifications.get_mut(&notification.id) {
            Some(slot) => {
                *slot = notification;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn notifications(&self) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self.with(|tables| tables.notifications.values().cloned().collect()))
    }

    fn notifications_for(&self, user: UserId) -> Result<Vec<Notification>, RepositoryError> {
        Ok(self.with(|tables| {
            tables
                .notifications
                .values()
                .filter(|notification| notification.user_id == user)
                .cloned()
                .collect()
        }))
    }
}

impl SessionStore for InMemoryStore {
    fn create_session(&self, user: UserId) -> Result<SessionToken, RepositoryError> {
        let token = SessionToken::generate();
        self.with(|tables| {
            tables.sessions.insert(token.clone(), Session::new(user));
        });
        Ok(token)
    }

    fn session(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError> {
        Ok(self.with(|tables| tables.sessions.get(token).cloned()))
    }

    fn save_session(&self, token: &SessionToken, session: Session) -> Result<(), RepositoryError> {
        self.with(|tables| match tables.sessions.get_mut(token) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn delete_session(&self, token: &SessionToken) -> Result<(), RepositoryError> {
        self.with(|tables| {
            tables.sessions.remove(token);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(nik: &str) -> UserDraft {
        UserDraft {
            nik: Nik::parse(nik).expect("valid nik"),
            nama: "Warga".to_string(),
            no_wa: None,
            email: None,
            password_hash: "hash".to_string(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[test]
    fn duplicate_nik_is_a_conflict() {
        let store = InMemoryStore::new();
        let first = store
            .insert_user(draft("3201234501010003"))
            .expect("insert succeeds");
        assert_eq!(first.id, UserId(1));

        assert!(matches!(
            store.insert_user(draft("3201234501010003")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn saving_an_unknown_session_fails() {
        let store = InMemoryStore::new();
        let token = store.create_session(UserId(7)).expect("session created");
        store.delete_session(&token).expect("delete succeeds");

        assert!(store.session(&token).expect("lookup").is_none());
        assert!(matches!(
            store.save_session(&token, Session::new(UserId(7))),
            Err(RepositoryError::NotFound)
        ));
    }
}
