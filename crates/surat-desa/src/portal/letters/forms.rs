use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::LetterType;
use crate::portal::accounts::{Nik, User};
use crate::portal::validation::{self, Choice, ChoiceView, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "L")]
    LakiLaki,
    #[serde(rename = "P")]
    Perempuan,
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::LakiLaki, Gender::Perempuan];

    fn code(self) -> &'static str {
        match self {
            Gender::LakiLaki => "L",
            Gender::Perempuan => "P",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Gender::LakiLaki => "Laki-laki",
            Gender::Perempuan => "Perempuan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Religion {
    Islam,
    Kristen,
    Katolik,
    Hindu,
    Buddha,
    Konghucu,
}

impl Choice for Religion {
    const ALL: &'static [Self] = &[
        Religion::Islam,
        Religion::Kristen,
        Religion::Katolik,
        Religion::Hindu,
        Religion::Buddha,
        Religion::Konghucu,
    ];

    fn code(self) -> &'static str {
        match self {
            Religion::Islam => "ISLAM",
            Religion::Kristen => "KRISTEN",
            Religion::Katolik => "KATOLIK",
            Religion::Hindu => "HINDU",
            Religion::Buddha => "BUDDHA",
            Religion::Konghucu => "KONGHUCU",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Religion::Islam => "Islam",
            Religion::Kristen => "Kristen (Protestan)",
            Religion::Katolik => "Katolik",
            Religion::Hindu => "Hindu",
            Religion::Buddha => "Buddha",
            Religion::Konghucu => "Konghucu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Menikah,
    BelumMenikah,
}

impl Choice for MaritalStatus {
    const ALL: &'static [Self] = &[MaritalStatus::Menikah, MaritalStatus::BelumMenikah];

    fn code(self) -> &'static str {
        match self {
            MaritalStatus::Menikah => "MENIKAH",
            MaritalStatus::BelumMenikah => "BELUM_MENIKAH",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MaritalStatus::Menikah => "Menikah",
            MaritalStatus::BelumMenikah => "Belum Menikah",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Citizenship {
    #[serde(rename = "WNI")]
    Wni,
    #[serde(rename = "WNA")]
    Wna,
}

impl Choice for Citizenship {
    const ALL: &'static [Self] = &[Citizenship::Wni, Citizenship::Wna];

    fn code(self) -> &'static str {
        match self {
            Citizenship::Wni => "WNI",
            Citizenship::Wna => "WNA",
        }
    }

    fn label(self) -> &'static str {
        self.code()
    }
}

/// Fields beyond the shared identity block, per letter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraField {
    Kewarganegaraan,
    Agama,
    StatusPernikahan,
}

impl ExtraField {
    pub fn name(self) -> &'static str {
        match self {
            ExtraField::Kewarganegaraan => "kewarganegaraan",
            ExtraField::Agama => "agama",
            ExtraField::StatusPernikahan => "status_pernikahan",
        }
    }

    fn choices(self) -> Vec<ChoiceView> {
        match self {
            ExtraField::Kewarganegaraan => validation::choices::<Citizenship>(),
            ExtraField::Agama => validation::choices::<Religion>(),
            ExtraField::StatusPernikahan => validation::choices::<MaritalStatus>(),
        }
    }
}

impl LetterType {
    pub fn extra_fields(self) -> &'static [ExtraField] {
        match self {
            LetterType::Sktm => &[],
            LetterType::Domisili => &[
                ExtraField::Kewarganegaraan,
                ExtraField::Agama,
                ExtraField::StatusPernikahan,
            ],
            LetterType::BelumMenikah => &[ExtraField::Agama],
            LetterType::Skck => &[ExtraField::Agama, ExtraField::StatusPernikahan],
        }
    }
}

const BASE_FIELDS: [&str; 7] = [
    "nama",
    "nik",
    "tempat_lahir",
    "tanggal_lahir",
    "jenis_kelamin",
    "pekerjaan",
    "alamat",
];

/// Raw letter form input. Fields a letter type does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterFormData {
    pub nama: String,
    pub nik: String,
    pub tempat_lahir: String,
    pub tanggal_lahir: String,
    pub jenis_kelamin: String,
    pub pekerjaan: String,
    pub alamat: String,
    pub kewarganegaraan: String,
    pub agama: String,
    pub status_pernikahan: String,
}

/// Validated letter data; serialized as the request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDetails {
    pub nama: String,
    pub nik: Nik,
    pub tempat_lahir: String,
    pub tanggal_lahir: NaiveDate,
    pub jenis_kelamin: Gender,
    pub pekerjaan: String,
    pub alamat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kewarganegaraan: Option<Citizenship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agama: Option<Religion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_pernikahan: Option<MaritalStatus>,
}

impl LetterDetails {
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Description of one form field for clients rendering the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceView>,
}

/// The form for one letter type, bound to the logged-in citizen.
#[derive(Debug, Clone, Copy)]
pub struct LetterForm<'a> {
    letter_type: LetterType,
    account: Option<&'a User>,
}

impl<'a> LetterForm<'a> {
    pub fn new(letter_type: LetterType, account: Option<&'a User>) -> Self {
        Self {
            letter_type,
            account,
        }
    }

    pub fn letter_type(&self) -> LetterType {
        self.letter_type
    }

    pub fn fields(&self) -> Vec<FieldSpec> {
        let base = BASE_FIELDS.iter().map(|&name| FieldSpec {
            name,
            choices: if name == "jenis_kelamin" {
                validation::choices::<Gender>()
            } else {
                Vec::new()
            },
        });
        let extra = self.letter_type.extra_fields().iter().map(|field| FieldSpec {
            name: field.name(),
            choices: field.choices(),
        });
        base.chain(extra).collect()
    }

    /// Initial values: the account's name and NIK.
    pub fn initial(&self) -> LetterFormData {
        match self.account {
            Some(user) => LetterFormData {
                nama: user.nama.clone(),
                nik: user.nik.to_string(),
                ..LetterFormData::default()
            },
            None => LetterFormData::default(),
        }
    }

    pub fn validate(&self, data: &LetterFormData) -> Result<LetterDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nama = validation::account_name(
            &mut errors,
            "nama",
            &data.nama,
            self.account.map(|user| user.nama.as_str()),
            "Nama harus sama dengan nama akun (sesuai data akun desa).",
        );
        let nik = validation::nik(
            &mut errors,
            "nik",
            &data.nik,
            self.account.map(|user| &user.nik),
            "NIK harus sama dengan NIK akun login.",
        );
        let tempat_lahir =
            validation::text(&mut errors, "tempat_lahir", &data.tempat_lahir, Some(60));
        let tanggal_lahir = validation::date(&mut errors, "tanggal_lahir", &data.tanggal_lahir);
        let jenis_kelamin =
            validation::choice::<Gender>(&mut errors, "jenis_kelamin", &data.jenis_kelamin);
        let pekerjaan = validation::text(&mut errors, "pekerjaan", &data.pekerjaan, Some(60));
        let alamat = validation::text(&mut errors, "alamat", &data.alamat, None);

        let extras = self.letter_type.extra_fields();
        let kewarganegaraan = extras.contains(&ExtraField::Kewarganegaraan).then(|| {
            validation::choice::<Citizenship>(&mut errors, "kewarganegaraan", &data.kewarganegaraan)
        });
        let agama = extras
            .contains(&ExtraField::Agama)
            .then(|| validation::choice::<Religion>(&mut errors, "agama", &data.agama));
        let status_pernikahan = extras.contains(&ExtraField::StatusPernikahan).then(|| {
            validation::choice::<MaritalStatus>(
                &mut errors,
                "status_pernikahan",
                &data.status_pernikahan,
            )
        });

        errors.finish(|| {
            Some(LetterDetails {
                nama: nama?,
                nik: nik?,
                tempat_lahir: tempat_lahir?,
                tanggal_lahir: tanggal_lahir?,
                jenis_kelamin: jenis_kelamin?,
                pekerjaan: pekerjaan?,
                alamat: alamat?,
                kewarganegaraan: required_extra(kewarganegaraan)?,
                agama: required_extra(agama)?,
                status_pernikahan: required_extra(status_pernikahan)?,
            })
        })
    }
}

/// `None` (field not part of this form) passes; a present-but-invalid field fails.
fn required_extra<T>(value: Option<Option<T>>) -> Option<Option<T>> {
    match value {
        None => Some(None),
        Some(Some(value)) => Some(Some(value)),
        Some(None) => None,
    }
}

/// Raw verification step input. `jenis_surat` is accepted but never trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationData {
    pub nama: String,
    pub nik: String,
    pub alamat: String,
    pub jenis_surat: String,
}

/// Identity confirmed on the verification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub nama: String,
    pub nik: Nik,
    pub alamat: String,
    pub letter_type: LetterType,
}

/// Re-confirms identity before the request is persisted; the letter type is locked
/// to the one chosen earlier in the session.
#[derive(Debug, Clone, Copy)]
pub struct VerificationForm<'a> {
    account: Option<&'a User>,
    expected_type: LetterType,
}

impl<'a> VerificationForm<'a> {
    pub fn new(account: Option<&'a User>, expected_type: LetterType) -> Self {
        Self {
            account,
            expected_type,
        }
    }

    pub fn validate(&self, data: &VerificationData) -> Result<VerifiedIdentity, FieldErrors> {
        let mut errors = FieldErrors::new();

        let nama = validation::account_name(
            &mut errors,
            "nama",
            &data.nama,
            self.account.map(|user| user.nama.as_str()),
            "Nama verifikasi harus sama dengan nama akun.",
        );
        let nik = validation::nik(
            &mut errors,
            "nik",
            &data.nik,
            self.account.map(|user| &user.nik),
            "NIK verifikasi harus sama dengan akun login.",
        );
        let alamat = validation::text(&mut errors, "alamat", &data.alamat, None);

        errors.finish(|| {
            Some(VerifiedIdentity {
                nama: nama?,
                nik: nik?,
                alamat: alamat?,
                letter_type: self.expected_type,
            })
        })
    }
}
