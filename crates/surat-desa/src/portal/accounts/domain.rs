use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NIK_LENGTH: usize = 16;

/// Database identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// National identity number: exactly sixteen ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nik(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NikError {
    #[error("NIK hanya boleh angka.")]
    NotDigits,
    #[error("NIK harus 16 digit.")]
    WrongLength,
}

impl Nik {
    pub fn parse(raw: &str) -> Result<Self, NikError> {
        let value = raw.trim();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(NikError::NotDigits);
        }
        if value.len() != NIK_LENGTH {
            return Err(NikError::WrongLength);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nik {
    type Error = NikError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Nik::parse(&value)
    }
}

impl From<Nik> for String {
    fn from(value: Nik) -> Self {
        value.0
    }
}

/// Citizen or staff account. Citizens log in with their NIK.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub nik: Nik,
    pub nama: String,
    pub no_wa: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        if self.is_staff {
            Role::Staff
        } else {
            Role::Warga
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.nik, self.nama)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Warga,
    Staff,
}

/// Account fields supplied to the user manager; the NIK is still raw input here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nik: String,
    pub nama: String,
    pub no_wa: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn warga(nik: impl Into<String>, nama: impl Into<String>) -> Self {
        Self {
            nik: nik.into(),
            nama: nama.into(),
            no_wa: None,
            email: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

/// Validated record handed to the repository, which assigns the id and join date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub nik: Nik,
    pub nama: String,
    pub no_wa: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}
