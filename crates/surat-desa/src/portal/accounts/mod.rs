//! Citizen and staff accounts keyed by NIK.

pub mod domain;
pub mod forms;
mod password;
pub mod service;

pub use domain::{Nik, NikError, NewUser, Role, User, UserDraft, UserId, NIK_LENGTH};
pub use forms::{
    AdminUserForm, CleanRegistration, LoginForm, RegistrationForm, UserUpdate,
    MIN_PASSWORD_LENGTH,
};
pub use password::{
    PasswordHashError, PasswordHasher, DEFAULT_PASSWORD_ITERATIONS, DEFAULT_PASSWORD_MEMORY_KIB,
};
pub use service::{AccountError, AccountService, LoginGrant, UserQuery, INVALID_CREDENTIALS};
