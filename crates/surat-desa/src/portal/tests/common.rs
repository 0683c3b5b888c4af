use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Builder as RequestBuilder;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::portal::accounts::{LoginForm, NewUser, Nik, PasswordHasher, User, UserDraft, UserId};
use crate::portal::letters::{
    LetterFormData, LetterRequest, LetterRequestDraft, LetterRequestId, LetterType, Notification,
    NotificationDraft, VerificationData,
};
use crate::portal::memory::InMemoryStore;
use crate::portal::repository::{
    LetterRepository, NotificationRepository, RepositoryError, SessionStore, UserRepository,
};
use crate::portal::session::{AuthSession, Session, SessionToken};
use crate::portal::validation::Choice;
use crate::portal::{portal_router, Portal};

pub(super) const CITIZEN_NIK: &str = "3201234501010003";
pub(super) const CITIZEN_NAMA: &str = "Naswa Malika";
pub(super) const OTHER_NIK: &str = "3201234501010004";
pub(super) const STAFF_NIK: &str = "3201000000000001";
pub(super) const PASSWORD: &str = "Password123!";

pub(super) fn hasher() -> PasswordHasher {
    PasswordHasher::with_cost(64, 1)
}

pub(super) fn build_portal() -> (Arc<Portal<InMemoryStore>>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let portal = Arc::new(Portal::new(store.clone(), hasher()));
    (portal, store)
}

pub(super) fn citizen(portal: &Portal<InMemoryStore>) -> User {
    portal
        .accounts
        .create_user(
            NewUser {
                no_wa: Some("081234567890".to_string()),
                email: Some("naswa@example.com".to_string()),
                ..NewUser::warga(CITIZEN_NIK, CITIZEN_NAMA)
            },
            PASSWORD,
        )
        .expect("citizen created")
}

pub(super) fn other_citizen(portal: &Portal<InMemoryStore>) -> User {
    portal
        .accounts
        .create_user(NewUser::warga(OTHER_NIK, "Raka Pratama"), PASSWORD)
        .expect("second citizen created")
}

pub(super) fn staff(portal: &Portal<InMemoryStore>) -> User {
    portal
        .accounts
        .create_superuser(STAFF_NIK, "Petugas Desa", PASSWORD)
        .expect("staff created")
}

pub(super) fn login(portal: &Portal<InMemoryStore>, nik: &str) -> AuthSession {
    let grant = portal
        .accounts
        .login(&LoginForm {
            nik: nik.to_string(),
            password: PASSWORD.to_string(),
        })
        .expect("login succeeds");
    portal
        .accounts
        .resolve(&grant.token)
        .expect("resolve succeeds")
        .expect("session present")
}

pub(super) fn sktm_form() -> LetterFormData {
    LetterFormData {
        nama: CITIZEN_NAMA.to_string(),
        nik: CITIZEN_NIK.to_string(),
        tempat_lahir: "Bandung".to_string(),
        tanggal_lahir: "2000-01-01".to_string(),
        jenis_kelamin: "P".to_string(),
        pekerjaan: "Mahasiswa".to_string(),
        alamat: "Jl. Contoh No. 1".to_string(),
        ..LetterFormData::default()
    }
}

pub(super) fn domisili_form() -> LetterFormData {
    LetterFormData {
        kewarganegaraan: "WNI".to_string(),
        agama: "ISLAM".to_string(),
        status_pernikahan: "BELUM_MENIKAH".to_string(),
        ..sktm_form()
    }
}

pub(super) fn verification_data() -> VerificationData {
    VerificationData {
        nama: CITIZEN_NAMA.to_string(),
        nik: CITIZEN_NIK.to_string(),
        alamat: "Jl. Contoh No. 1".to_string(),
        jenis_surat: "SKTM".to_string(),
    }
}

/// Runs the wizard to completion for `auth` and returns the stored request.
pub(super) fn submit_letter(
    portal: &Portal<InMemoryStore>,
    auth: &mut AuthSession,
    letter_type: LetterType,
    data: &LetterFormData,
) -> LetterRequest {
    let code = letter_type.code();
    portal
        .submissions
        .choose_type(auth, code)
        .expect("type chosen");
    portal
        .submissions
        .fill(auth, code, data)
        .expect("form accepted");
    portal
        .submissions
        .verify(auth, &verification_data())
        .expect("verification accepted")
}

fn bearer(builder: RequestBuilder, token: &SessionToken) -> RequestBuilder {
    builder.header(header::AUTHORIZATION, format!("Bearer {}", token.as_str()))
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    token: Option<&SessionToken>,
    body: &Value,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let builder = match token {
        Some(token) => bearer(builder, token),
        None => builder,
    };
    builder
        .body(Body::from(serde_json::to_vec(body).expect("json body")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str, token: Option<&SessionToken>) -> Request<Body> {
    let builder = Request::builder().method("GET").uri(uri);
    let builder = match token {
        Some(token) => bearer(builder, token),
        None => builder,
    };
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn router(portal: &Arc<Portal<InMemoryStore>>) -> axum::Router {
    portal_router(portal.clone())
}

pub(super) fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

/// Store whose every call fails, for the 500 paths.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl UserRepository for UnavailableStore {
    fn insert_user(&self, _draft: UserDraft) -> Result<User, RepositoryError> {
        offline()
    }

    fn update_user(&self, _user: User) -> Result<(), RepositoryError> {
        offline()
    }

    fn user(&self, _id: UserId) -> Result<Option<User>, RepositoryError> {
        offline()
    }

    fn user_by_nik(&self, _nik: &Nik) -> Result<Option<User>, RepositoryError> {
        offline()
    }

    fn users(&self) -> Result<Vec<User>, RepositoryError> {
        offline()
    }
}

impl LetterRepository for UnavailableStore {
    fn insert_request(&self, _draft: LetterRequestDraft) -> Result<LetterRequest, RepositoryError> {
        offline()
    }

    fn update_request(&self, _request: LetterRequest) -> Result<LetterRequest, RepositoryError> {
        offline()
    }

    fn request(&self, _id: LetterRequestId) -> Result<Option<LetterRequest>, RepositoryError> {
        offline()
    }

    fn requests(&self) -> Result<Vec<LetterRequest>, RepositoryError> {
        offline()
    }

    fn requests_for(&self, _user: UserId) -> Result<Vec<LetterRequest>, RepositoryError> {
        offline()
    }
}

impl NotificationRepository for UnavailableStore {
    fn insert_notification(&self, _draft: NotificationDraft) -> Result<Notification, RepositoryError> {
        offline()
    }

    fn update_notification(&self, _notification: Notification) -> Result<(), RepositoryError> {
        offline()
    }

    fn notifications(&self) -> Result<Vec<Notification>, RepositoryError> {
        offline()
    }

    fn notifications_for(&self, _user: UserId) -> Result<Vec<Notification>, RepositoryError> {
        offline()
    }
}

impl SessionStore for UnavailableStore {
    fn create_session(&self, _user: UserId) -> Result<SessionToken, RepositoryError> {
        offline()
    }

    fn session(&self, _token: &SessionToken) -> Result<Option<Session>, RepositoryError> {
        offline()
    }

    fn save_session(&self, _token: &SessionToken, _session: Session) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_session(&self, _token: &SessionToken) -> Result<(), RepositoryError> {
        offline()
    }
}
