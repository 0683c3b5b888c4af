//! Field-level validation shared by the account, letter and verification forms.
//!
//! Every form collects all of its field errors before reporting, so a citizen
//! sees every problem with a submission at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::accounts::Nik;

pub const REQUIRED: &str = "Field ini wajib diisi.";
pub const INVALID_CHOICE: &str = "Pilihan tidak valid.";
pub const INVALID_DATE: &str = "Tanggal tidak valid.";
pub const INVALID_EMAIL: &str = "Masukkan alamat email yang valid.";

/// Error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when any message on `field` contains `needle`.
    pub fn mentions(&self, field: &str, needle: &str) -> bool {
        self.get(field).iter().any(|message| message.contains(needle))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        // A clean error set with a missing value means a field helper skipped reporting.
        value().ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("__all__", REQUIRED);
            errors
        })
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A closed set of coded options, rendered as a dropdown or radio group.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn code(self) -> &'static str;
    fn label(self) -> &'static str;

    fn from_code(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.code() == raw)
    }
}

/// Code/label pair exposed to clients building a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub code: &'static str,
    pub label: &'static str,
}

pub fn choices<T: Choice>() -> Vec<ChoiceView> {
    T::ALL
        .iter()
        .map(|choice| ChoiceView {
            code: choice.code(),
            label: choice.label(),
        })
        .collect()
}

pub(crate) fn text(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    max_len: Option<usize>,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.add(field, format!("Maksimal {max} karakter."));
            return None;
        }
    }
    Some(value.to_string())
}

pub(crate) fn choice<T: Choice>(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<T> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    let parsed = T::from_code(value);
    if parsed.is_none() {
        errors.add(field, INVALID_CHOICE);
    }
    parsed
}

pub(crate) fn date(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, INVALID_DATE);
            None
        }
    }
}

pub(crate) fn email(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<String> {
    let value = text(errors, field, raw, Some(254))?;
    if looks_like_email(&value) {
        Some(value)
    } else {
        errors.add(field, INVALID_EMAIL);
        None
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// NIK field: digits only, sixteen of them, optionally pinned to the logged-in account.
pub(crate) fn nik(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    account: Option<&Nik>,
    mismatch: &str,
) -> Option<Nik> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match Nik::parse(value) {
        Ok(parsed) => match account {
            Some(expected) if expected != &parsed => {
                errors.add(field, mismatch);
                None
            }
            _ => Some(parsed),
        },
        Err(err) => {
            errors.add(field, err.to_string());
            None
        }
    }
}

/// Name field compared case-insensitively against the account holder's name.
pub(crate) fn account_name(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    account: Option<&str>,
    mismatch: &str,
) -> Option<String> {
    let value = text(errors, field, raw, Some(100))?;
    match account {
        Some(expected) if !same_name(&value, expected) => {
            errors.add(field, mismatch);
            None
        }
        _ => Some(value),
    }
}

/// Full Unicode casefold, so `Straße` and `STRASSE` are the same name.
pub(crate) fn same_name(left: &str, right: &str) -> bool {
    caseless::default_caseless_match_str(left.trim(), right.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_trims_and_enforces_length() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            text(&mut errors, "nama", "  Siti  ", Some(100)),
            Some("Siti".to_string())
        );
        assert_eq!(text(&mut errors, "pekerjaan", &"x".repeat(61), Some(60)), None);
        assert_eq!(text(&mut errors, "alamat", "   ", None), None);
        assert!(errors.mentions("pekerjaan", "Maksimal 60 karakter"));
        assert_eq!(errors.get("alamat"), &[REQUIRED.to_string()][..]);
    }

    #[test]
    fn email_requires_domain_with_dot() {
        let mut errors = FieldErrors::new();
        assert!(email(&mut errors, "email", "warga@desa.id").is_some());
        assert!(email(&mut errors, "email", "warga@desa").is_none());
        assert!(email(&mut errors, "email", "warga desa@desa.id").is_none());
        assert_eq!(errors.get("email").len(), 2);
    }

    #[test]
    fn display_joins_every_message() {
        let mut errors = FieldErrors::new();
        errors.add("nik", "NIK harus 16 digit.");
        errors.add("nama", REQUIRED);
        assert_eq!(
            errors.to_string(),
            "nama: Field ini wajib diisi.; nik: NIK harus 16 digit."
        );
    }

    #[test]
    fn names_match_under_unicode_casefold() {
        assert!(same_name("STRASSE", "Straße"));
        assert!(same_name("  naswa MALIKA ", "Naswa Malika"));
        assert!(!same_name("Naswa", "Nasya"));

        let mut errors = FieldErrors::new();
        let matched = account_name(&mut errors, "nama", "GROSS", Some("Groß"), "beda");
        assert_eq!(matched.as_deref(), Some("GROSS"));
        assert!(errors.is_empty());
    }
}
