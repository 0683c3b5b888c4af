use serde::{Deserialize, Serialize};

use super::domain::Nik;
use crate::portal::validation::{self, FieldErrors};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Citizen self-registration as posted by the sign-up page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub nama: String,
    pub nik: String,
    pub no_wa: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Registration after field validation; NIK uniqueness is checked against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanRegistration {
    pub nama: String,
    pub nik: Nik,
    pub no_wa: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    /// `nik_taken` reports whether an account already uses the NIK.
    pub fn validate(
        &self,
        nik_taken: impl FnOnce(&Nik) -> bool,
    ) -> Result<CleanRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nama = validation::text(&mut errors, "nama", &self.nama, Some(100));
        let nik = validation::nik(&mut errors, "nik", &self.nik, None, "");
        let nik = match nik {
            Some(nik) if nik_taken(&nik) => {
                errors.add("nik", "NIK sudah terdaftar. Silahkan login.");
                None
            }
            other => other,
        };
        let no_wa = validation::text(&mut errors, "no_wa", &self.no_wa, Some(13))
            .and_then(|value| whatsapp_number(&mut errors, "no_wa", value));
        let email = validation::email(&mut errors, "email", &self.email);
        let password = passwords(&mut errors, &self.password1, &self.password2);

        errors.finish(|| {
            Some(CleanRegistration {
                nama: nama?,
                nik: nik?,
                no_wa: no_wa?,
                email: email?,
                password: password?,
            })
        })
    }
}

/// NIK + password pair posted by the login page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub nik: String,
    pub password: String,
}

/// Staff-side account creation, including permission flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminUserForm {
    pub nik: String,
    pub nama: String,
    pub email: String,
    pub no_wa: String,
    pub password1: String,
    pub password2: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl Default for AdminUserForm {
    fn default() -> Self {
        Self {
            nik: String::new(),
            nama: String::new(),
            email: String::new(),
            no_wa: String::new(),
            password1: String::new(),
            password2: String::new(),
            is_staff: false,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanAdminUser {
    pub nik: Nik,
    pub nama: String,
    pub email: Option<String>,
    pub no_wa: Option<String>,
    pub password: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl AdminUserForm {
    pub fn validate(
        &self,
        nik_taken: impl FnOnce(&Nik) -> bool,
    ) -> Result<CleanAdminUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nik = match validation::nik(&mut errors, "nik", &self.nik, None, "") {
            Some(nik) if nik_taken(&nik) => {
                errors.add("nik", "Pengguna dengan NIK ini sudah ada.");
                None
            }
            other => other,
        };
        let nama = validation::text(&mut errors, "nama", &self.nama, Some(100));
        let email = optional(&self.email, |raw| {
            validation::email(&mut errors, "email", raw)
        });
        let no_wa = optional(&self.no_wa, |raw| {
            whatsapp_number(&mut errors, "no_wa", raw.to_string())
        });
        let password = passwords(&mut errors, &self.password1, &self.password2);

        errors.finish(|| {
            Some(CleanAdminUser {
                nik: nik?,
                nama: nama?,
                email: email?,
                no_wa: no_wa?,
                password: password?,
                is_staff: self.is_staff,
                is_active: self.is_active,
            })
        })
    }
}

/// Partial edit of an account from the admin surface. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub no_wa: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// `UserUpdate` with every present field validated. Inner `None` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanUserUpdate {
    pub nama: Option<String>,
    pub email: Option<Option<String>>,
    pub no_wa: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<CleanUserUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nama = self
            .nama
            .as_deref()
            .map(|raw| validation::text(&mut errors, "nama", raw, Some(100)));
        let email = self.email.as_deref().map(|raw| {
            optional(raw, |value| validation::email(&mut errors, "email", value))
        });
        let no_wa = self.no_wa.as_deref().map(|raw| {
            optional(raw, |value| {
                whatsapp_number(&mut errors, "no_wa", value.to_string())
            })
        });

        errors.finish(|| {
            Some(CleanUserUpdate {
                nama: nama.flatten(),
                email: match email {
                    Some(checked) => Some(checked?),
                    None => None,
                },
                no_wa: match no_wa {
                    Some(checked) => Some(checked?),
                    None => None,
                },
                is_active: self.is_active,
                is_staff: self.is_staff,
                is_superuser: self.is_superuser,
            })
        })
    }
}

/// Blank input means "not provided"; anything else goes through `check`.
/// The outer `Option` is `None` only when `check` rejected the value.
fn optional(
    raw: &str,
    check: impl FnOnce(&str) -> Option<String>,
) -> Option<Option<String>> {
    let value = raw.trim();
    if value.is_empty() {
        Some(None)
    } else {
        check(value).map(Some)
    }
}

fn whatsapp_number(errors: &mut FieldErrors, field: &str, value: String) -> Option<String> {
    let digits = value.replace('+', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "No WA harus angka (boleh diawali +).");
        return None;
    }
    if !(9..=15).contains(&digits.len()) {
        errors.add(field, "No WA panjang 9–15 digit.");
        return None;
    }
    Some(value)
}

fn passwords(errors: &mut FieldErrors, password1: &str, password2: &str) -> Option<String> {
    let mut valid = true;
    if password1.is_empty() {
        errors.add("password1", validation::REQUIRED);
        valid = false;
    } else if password1.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password1", "Kata sandi minimal 8 karakter.");
        valid = false;
    }
    if password2.is_empty() {
        errors.add("password2", validation::REQUIRED);
        valid = false;
    } else if !password1.is_empty() && password1 != password2 {
        errors.add("password2", "Kata sandi tidak sama.");
        valid = false;
    }
    valid.then(|| password1.to_string())
}
