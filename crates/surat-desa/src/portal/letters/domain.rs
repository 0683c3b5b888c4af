use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::accounts::{Nik, UserId};
use crate::portal::validation::Choice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterRequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

/// The four letters a citizen can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LetterType {
    Sktm,
    Domisili,
    BelumMenikah,
    Skck,
}

impl Choice for LetterType {
    const ALL: &'static [Self] = &[
        LetterType::Sktm,
        LetterType::Domisili,
        LetterType::BelumMenikah,
        LetterType::Skck,
    ];

    fn code(self) -> &'static str {
        match self {
            LetterType::Sktm => "SKTM",
            LetterType::Domisili => "DOMISILI",
            LetterType::BelumMenikah => "BELUM_MENIKAH",
            LetterType::Skck => "SKCK",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LetterType::Sktm => "Surat Keterangan Tidak Mampu",
            LetterType::Domisili => "Surat Keterangan Domisili",
            LetterType::BelumMenikah => "Surat Keterangan Belum Menikah",
            LetterType::Skck => "Surat Pengantar SKCK",
        }
    }
}

/// Review state of a letter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Diproses,
    Disetujui,
    TelahDiambil,
    Ditolak,
}

impl Choice for RequestStatus {
    const ALL: &'static [Self] = &[
        RequestStatus::Diproses,
        RequestStatus::Disetujui,
        RequestStatus::TelahDiambil,
        RequestStatus::Ditolak,
    ];

    fn code(self) -> &'static str {
        match self {
            RequestStatus::Diproses => "DIPROSES",
            RequestStatus::Disetujui => "DISETUJUI",
            RequestStatus::TelahDiambil => "TELAH_DIAMBIL",
            RequestStatus::Ditolak => "DITOLAK",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RequestStatus::Diproses => "Dalam Proses",
            RequestStatus::Disetujui => "Disetujui",
            RequestStatus::TelahDiambil => "Telah Diambil",
            RequestStatus::Ditolak => "Ditolak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for LetterType {
    type Err = UnknownCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_code(raw).ok_or_else(|| UnknownCode(raw.to_string()))
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_code(raw).ok_or_else(|| UnknownCode(raw.to_string()))
    }
}

impl fmt::Display for LetterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A citizen's submitted request. `nama`, `nik` and `alamat` are a display snapshot;
/// the type-specific form data lives in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterRequest {
    pub id: LetterRequestId,
    pub user_id: UserId,
    pub letter_type: LetterType,
    pub status: RequestStatus,
    pub nama: String,
    pub nik: Nik,
    pub alamat: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LetterRequest {
    pub fn letter_label(&self) -> &'static str {
        self.letter_type.label()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

impl fmt::Display for LetterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.nik, self.letter_type, self.status)
    }
}

/// New request as assembled by the verification step; always starts as `DIPROSES`.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterRequestDraft {
    pub user_id: UserId,
    pub letter_type: LetterType,
    pub nama: String,
    pub nik: Nik,
    pub alamat: String,
    pub payload: serde_json::Value,
}

/// Message pushed to a citizen, created as a side effect of review decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_type_codes_round_trip_through_serde() {
        for letter_type in LetterType::ALL {
            let encoded = serde_json::to_value(letter_type).expect("serialize");
            assert_eq!(encoded, serde_json::json!(letter_type.code()));
            assert_eq!(letter_type.code().parse::<LetterType>(), Ok(*letter_type));
        }
        assert!("sktm".parse::<LetterType>().is_err());
    }

    #[test]
    fn status_defaults_to_in_process() {
        assert_eq!(RequestStatus::default(), RequestStatus::Diproses);
        assert_eq!(RequestStatus::TelahDiambil.code(), "TELAH_DIAMBIL");
        assert_eq!(RequestStatus::TelahDiambil.label(), "Telah Diambil");
    }
}
