use super::common::*;
use crate::portal::accounts::{AdminUserForm, RegistrationForm, UserUpdate};
use crate::portal::letters::{
    Citizenship, LetterForm, LetterFormData, LetterType, MaritalStatus, Religion,
    VerificationData, VerificationForm,
};
use crate::portal::validation::{INVALID_CHOICE, INVALID_DATE, REQUIRED};

fn sktm_with(overrides: impl FnOnce(&mut LetterFormData)) -> LetterFormData {
    let mut data = sktm_form();
    overrides(&mut data);
    data
}

#[test]
fn p1_valid_sktm_form_is_accepted() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let details = LetterForm::new(LetterType::Sktm, Some(&user))
        .validate(&sktm_form())
        .expect("valid form");

    assert_eq!(details.nik.as_str(), CITIZEN_NIK);
    assert_eq!(details.tanggal_lahir.to_string(), "2000-01-01");
    assert!(details.agama.is_none());

    let payload = details.to_payload();
    assert_eq!(payload["tanggal_lahir"], "2000-01-01");
    assert_eq!(payload["jenis_kelamin"], "P");
    assert!(payload.get("agama").is_none());
}

#[test]
fn p2_non_digit_nik_is_rejected() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let errors = LetterForm::new(LetterType::Sktm, Some(&user))
        .validate(&sktm_with(|data| data.nik = "32012A4501010003".to_string()))
        .expect_err("non-digit nik");

    assert!(errors.mentions("nik", "NIK hanya boleh angka"));
}

#[test]
fn p3_short_nik_is_rejected() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let errors = LetterForm::new(LetterType::Sktm, Some(&user))
        .validate(&sktm_with(|data| data.nik = "32012345".to_string()))
        .expect_err("short nik");

    assert!(errors.mentions("nik", "NIK harus 16 digit"));
}

#[test]
fn p4_nik_of_another_account_is_rejected() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let errors = LetterForm::new(LetterType::Sktm, Some(&user))
        .validate(&sktm_with(|data| data.nik = OTHER_NIK.to_string()))
        .expect_err("foreign nik");

    assert!(errors.mentions("nik", "NIK harus sama dengan NIK akun login"));
}

#[test]
fn name_comparison_ignores_case_and_padding() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);
    let form = LetterForm::new(LetterType::Sktm, Some(&user));

    let accepted = form.validate(&sktm_with(|data| data.nama = "  naswa MALIKA ".to_string()));
    assert_eq!(accepted.expect("case-insensitive match").nama, "naswa MALIKA");

    let errors = form
        .validate(&sktm_with(|data| data.nama = "Naswa".to_string()))
        .expect_err("different name");
    assert!(errors.mentions("nama", "Nama harus sama dengan nama akun"));
}

#[test]
fn every_field_error_is_reported_at_once() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let errors = LetterForm::new(LetterType::Sktm, Some(&user))
        .validate(&LetterFormData {
            tanggal_lahir: "2000-02-30".to_string(),
            jenis_kelamin: "X".to_string(),
            pekerjaan: "p".repeat(61),
            ..sktm_form()
        })
        .expect_err("three broken fields");

    assert_eq!(errors.get("tanggal_lahir"), &[INVALID_DATE.to_string()][..]);
    assert_eq!(errors.get("jenis_kelamin"), &[INVALID_CHOICE.to_string()][..]);
    assert!(errors.mentions("pekerjaan", "Maksimal 60 karakter."));
    assert!(errors.get("nik").is_empty());
}

#[test]
fn domisili_requires_its_extra_fields() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);
    let form = LetterForm::new(LetterType::Domisili, Some(&user));

    let errors = form.validate(&sktm_form()).expect_err("extras missing");
    for field in ["kewarganegaraan", "agama", "status_pernikahan"] {
        assert_eq!(errors.get(field), &[REQUIRED.to_string()][..], "{field}");
    }

    let details = form.validate(&domisili_form()).expect("complete domisili form");
    assert_eq!(details.kewarganegaraan, Some(Citizenship::Wni));
    assert_eq!(details.agama, Some(Religion::Islam));
    assert_eq!(details.status_pernikahan, Some(MaritalStatus::BelumMenikah));
}

#[test]
fn extra_fields_follow_the_letter_type() {
    let names = |letter_type: LetterType| -> Vec<&'static str> {
        LetterForm::new(letter_type, None)
            .fields()
            .iter()
            .map(|field| field.name)
            .skip(7)
            .collect()
    };

    assert!(names(LetterType::Sktm).is_empty());
    assert_eq!(names(LetterType::BelumMenikah), vec!["agama"]);
    assert_eq!(names(LetterType::Skck), vec!["agama", "status_pernikahan"]);
    assert_eq!(
        names(LetterType::Domisili),
        vec!["kewarganegaraan", "agama", "status_pernikahan"]
    );
}

#[test]
fn skck_ignores_fields_outside_its_form() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let details = LetterForm::new(LetterType::Skck, Some(&user))
        .validate(&LetterFormData {
            kewarganegaraan: "bogus".to_string(),
            ..domisili_form()
        })
        .expect("kewarganegaraan is not part of SKCK");

    assert!(details.kewarganegaraan.is_none());
    assert_eq!(details.status_pernikahan, Some(MaritalStatus::BelumMenikah));
}

#[test]
fn initial_values_come_from_the_account() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let initial = LetterForm::new(LetterType::Sktm, Some(&user)).initial();

    assert_eq!(initial.nama, CITIZEN_NAMA);
    assert_eq!(initial.nik, CITIZEN_NIK);
    assert!(initial.alamat.is_empty());
}

#[test]
fn verification_locks_the_letter_type() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let verified = VerificationForm::new(Some(&user), LetterType::Skck)
        .validate(&VerificationData {
            jenis_surat: "SKTM".to_string(),
            ..verification_data()
        })
        .expect("valid verification");

    assert_eq!(verified.letter_type, LetterType::Skck);
}

#[test]
fn verification_uses_its_own_mismatch_messages() {
    let (portal, _) = build_portal();
    let user = citizen(&portal);

    let errors = VerificationForm::new(Some(&user), LetterType::Sktm)
        .validate(&VerificationData {
            nama: "Orang Lain".to_string(),
            nik: OTHER_NIK.to_string(),
            alamat: "   ".to_string(),
            jenis_surat: String::new(),
        })
        .expect_err("mismatched identity");

    assert!(errors.mentions("nama", "Nama verifikasi harus sama dengan nama akun."));
    assert!(errors.mentions("nik", "NIK verifikasi harus sama dengan akun login."));
    assert_eq!(errors.get("alamat"), &[REQUIRED.to_string()][..]);
}

fn registration() -> RegistrationForm {
    RegistrationForm {
        nama: "Raka Pratama".to_string(),
        nik: OTHER_NIK.to_string(),
        no_wa: "+6281234567".to_string(),
        email: "raka@example.com".to_string(),
        password1: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
    }
}

#[test]
fn registration_accepts_a_complete_form() {
    let clean = registration().validate(|_| false).expect("valid registration");

    assert_eq!(clean.nik.as_str(), OTHER_NIK);
    assert_eq!(clean.no_wa, "+6281234567");
}

#[test]
fn registration_reports_taken_nik() {
    let errors = registration()
        .validate(|_| true)
        .expect_err("nik already registered");

    assert_eq!(
        errors.get("nik"),
        &["NIK sudah terdaftar. Silahkan login.".to_string()][..]
    );
}

#[test]
fn registration_checks_whatsapp_number() {
    let letters = RegistrationForm {
        no_wa: "08123abc".to_string(),
        ..registration()
    };
    let errors = letters.validate(|_| false).expect_err("letters in number");
    assert!(errors.mentions("no_wa", "No WA harus angka (boleh diawali +)."));

    let short = RegistrationForm {
        no_wa: "0812345".to_string(),
        ..registration()
    };
    let errors = short.validate(|_| false).expect_err("too few digits");
    assert!(errors.mentions("no_wa", "No WA panjang 9–15 digit."));
}

#[test]
fn registration_checks_passwords() {
    let short = RegistrationForm {
        password1: "pendek".to_string(),
        password2: "pendek".to_string(),
        ..registration()
    };
    let errors = short.validate(|_| false).expect_err("short password");
    assert!(errors.mentions("password1", "Kata sandi minimal 8 karakter."));

    let mismatch = RegistrationForm {
        password2: "Password124!".to_string(),
        ..registration()
    };
    let errors = mismatch.validate(|_| false).expect_err("mismatch");
    assert!(errors.mentions("password2", "Kata sandi tidak sama."));
    assert!(errors.get("password1").is_empty());
}

#[test]
fn registration_requires_every_field() {
    let errors = RegistrationForm::default()
        .validate(|_| false)
        .expect_err("empty form");

    for field in ["nama", "nik", "no_wa", "email", "password1"] {
        assert!(!errors.get(field).is_empty(), "{field} should be reported");
    }
}

#[test]
fn admin_form_treats_contact_fields_as_optional() {
    let form = AdminUserForm {
        nik: OTHER_NIK.to_string(),
        nama: "Raka Pratama".to_string(),
        password1: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
        ..AdminUserForm::default()
    };

    let clean = form.validate(|_| false).expect("minimal admin form");
    assert!(clean.email.is_none());
    assert!(clean.no_wa.is_none());
    assert!(clean.is_active);
    assert!(!clean.is_staff);

    let errors = form.validate(|_| true).expect_err("duplicate nik");
    assert!(errors.mentions("nik", "Pengguna dengan NIK ini sudah ada."));
}

#[test]
fn user_update_validates_only_present_fields() {
    let clean = UserUpdate {
        email: Some(String::new()),
        is_staff: Some(true),
        ..UserUpdate::default()
    }
    .validate()
    .expect("clearing email is allowed");
    assert_eq!(clean.email, Some(None));
    assert_eq!(clean.nama, None);
    assert_eq!(clean.is_staff, Some(true));

    let errors = UserUpdate {
        email: Some("not-an-email".to_string()),
        ..UserUpdate::default()
    }
    .validate()
    .expect_err("bad email");
    assert!(!errors.get("email").is_empty());
}
