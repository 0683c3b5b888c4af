use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{Nik, NikError, NewUser, User, UserDraft, UserId};
use super::forms::{AdminUserForm, LoginForm, RegistrationForm, UserUpdate};
use super::password::{PasswordHashError, PasswordHasher};
use crate::portal::repository::{RepositoryError, SessionStore, UserRepository};
use crate::portal::session::{AuthSession, SessionToken};
use crate::portal::validation::FieldErrors;

pub const INVALID_CREDENTIALS: &str = "NIK atau kata sandi salah.";

/// Account manager: registration, credential checks, sessions and staff-side user edits.
pub struct AccountService<S> {
    store: Arc<S>,
    hasher: PasswordHasher,
}

/// Token issued by a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: SessionToken,
    pub user: User,
}

/// Filters for the staff user listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub q: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserQuery {
    fn matches(&self, user: &User) -> bool {
        if self.is_staff.is_some_and(|flag| flag != user.is_staff) {
            return false;
        }
        if self.is_active.is_some_and(|flag| flag != user.is_active) {
            return false;
        }
        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let needle = q.to_lowercase();
                [
                    Some(user.nik.as_str()),
                    Some(user.nama.as_str()),
                    user.email.as_deref(),
                    user.no_wa.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

impl<S> AccountService<S>
where
    S: UserRepository + SessionStore + 'static,
{
    pub fn new(store: Arc<S>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn create_user(&self, new_user: NewUser, password: &str) -> Result<User, AccountError> {
        if new_user.nik.trim().is_empty() {
            return Err(AccountError::MissingNik);
        }
        let nik = Nik::parse(&new_user.nik)?;
        let password_hash = self.hasher.hash(password)?;

        let user = self.store.insert_user(UserDraft {
            nik,
            nama: new_user.nama,
            no_wa: new_user.no_wa,
            email: new_user.email,
            password_hash,
            is_active: new_user.is_active,
            is_staff: new_user.is_staff,
            is_superuser: new_user.is_superuser,
        })?;

        info!(user_id = user.id.0, staff = user.is_staff, "account created");
        Ok(user)
    }

    /// Create an active staff superuser.
    pub fn create_superuser(
        &self,
        nik: &str,
        nama: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let new_user = NewUser {
            is_active: true,
            is_staff: true,
            is_superuser: true,
            ..NewUser::warga(nik, nama)
        };
        self.create_user(new_user, password)
    }

    /// Citizen self-registration.
    pub fn register(&self, form: &RegistrationForm) -> Result<User, AccountError> {
        let taken = self.nik_taken(&form.nik)?;
        let clean = form.validate(|_| taken)?;

        let new_user = NewUser {
            no_wa: Some(clean.no_wa),
            email: Some(clean.email),
            ..NewUser::warga(clean.nik.as_str(), clean.nama)
        };

        match self.create_user(new_user, &clean.password) {
            Err(AccountError::Repository(RepositoryError::Conflict)) => {
                let mut errors = FieldErrors::new();
                errors.add("nik", "NIK sudah terdaftar. Silahkan login.");
                Err(AccountError::Invalid(errors))
            }
            other => other,
        }
    }

    /// Malformed NIKs count as free; the form reports them.
    fn nik_taken(&self, raw: &str) -> Result<bool, AccountError> {
        match Nik::parse(raw) {
            Ok(nik) => Ok(self.store.user_by_nik(&nik)?.is_some()),
            Err(_) => Ok(false),
        }
    }

    /// Returns the account when the NIK exists, the account is active and the password matches.
    pub fn authenticate(&self, nik: &str, password: &str) -> Result<Option<User>, AccountError> {
        let Ok(nik) = Nik::parse(nik) else {
            return Ok(None);
        };
        let Some(user) = self.store.user_by_nik(&nik)? else {
            return Ok(None);
        };
        if !user.is_active || !self.hasher.verify(password, &user.password_hash) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    pub fn login(&self, form: &LoginForm) -> Result<LoginGrant, AccountError> {
        let Some(mut user) = self.authenticate(form.nik.trim(), &form.password)? else {
            warn!("rejected login attempt");
            return Err(AccountError::InvalidCredentials);
        };

        user.last_login = Some(Utc::now());
        self.store.update_user(user.clone())?;
        let token = self.store.create_session(user.id)?;

        info!(user_id = user.id.0, role = ?user.role(), "login succeeded");
        Ok(LoginGrant { token, user })
    }

    pub fn logout(&self, token: &SessionToken) -> Result<(), AccountError> {
        self.store.delete_session(token)?;
        Ok(())
    }

    /// Resolve a bearer token; unknown tokens and inactive accounts resolve to `None`.
    pub fn resolve(&self, token: &SessionToken) -> Result<Option<AuthSession>, AccountError> {
        let Some(session) = self.store.session(token)? else {
            return Ok(None);
        };
        let user = match self.store.user(session.user_id)? {
            Some(user) if user.is_active => user,
            _ => return Ok(None),
        };
        Ok(Some(AuthSession {
            token: token.clone(),
            user,
            session,
        }))
    }

    pub fn user(&self, id: UserId) -> Result<User, AccountError> {
        Ok(self.store.user(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Staff listing ordered by NIK.
    pub fn users(&self, query: &UserQuery) -> Result<Vec<User>, AccountError> {
        let mut users: Vec<User> = self
            .store
            .users()?
            .into_iter()
            .filter(|user| query.matches(user))
            .collect();
        users.sort_by(|left, right| left.nik.cmp(&right.nik));
        Ok(users)
    }

    /// Staff-side account creation.
    pub fn add_user(&self, form: &AdminUserForm) -> Result<User, AccountError> {
        let taken = self.nik_taken(&form.nik)?;
        let clean = form.validate(|_| taken)?;
        let new_user = NewUser {
            nik: clean.nik.to_string(),
            nama: clean.nama,
            no_wa: clean.no_wa,
            email: clean.email,
            is_active: clean.is_active,
            is_staff: clean.is_staff,
            is_superuser: false,
        };
        self.create_user(new_user, &clean.password)
    }

    pub fn update_user(&self, id: UserId, update: &UserUpdate) -> Result<User, AccountError> {
        let clean = update.validate()?;
        let mut user = self.user(id)?;

        if let Some(nama) = clean.nama {
            user.nama = nama;
        }
        if let Some(email) = clean.email {
            user.email = email;
        }
        if let Some(no_wa) = clean.no_wa {
            user.no_wa = no_wa;
        }
        if let Some(flag) = clean.is_active {
            user.is_active = flag;
        }
        if let Some(flag) = clean.is_staff {
            user.is_staff = flag;
        }
        if let Some(flag) = clean.is_superuser {
            user.is_superuser = flag;
        }

        self.store.update_user(user.clone())?;
        info!(user_id = user.id.0, "account updated");
        Ok(user)
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("NIK wajib diisi")]
    MissingNik,
    #[error(transparent)]
    InvalidNik(#[from] NikError),
    #[error("NIK atau kata sandi salah.")]
    InvalidCredentials,
    #[error("invalid form: {0}")]
    Invalid(#[from] FieldErrors),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
