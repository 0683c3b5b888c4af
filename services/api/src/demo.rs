use clap::Args;
use std::sync::Arc;
use surat_desa::error::AppError;
use surat_desa::portal::accounts::{LoginForm, RegistrationForm};
use surat_desa::portal::letters::{LetterFormData, LetterRequest, RequestStatus};
use surat_desa::portal::review::RequestQuery;
use surat_desa::portal::{
    AccountError, AuthSession, InMemoryStore, PasswordHasher, Portal, SubmissionError,
};

const DEMO_PASSWORD: &str = "Password123!";
const STAFF_NIK: &str = "3201000000000001";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Letter type code to request (SKTM, DOMISILI, BELUM_MENIKAH, SKCK)
    #[arg(long, default_value = "SKTM")]
    pub(crate) letter_type: String,
    /// Citizen NIK used for the demo registration
    #[arg(long, default_value = "3201234501010003")]
    pub(crate) nik: String,
    /// Citizen name used for the demo registration
    #[arg(long, default_value = "Naswa Malika")]
    pub(crate) nama: String,
    /// Reject the request instead of approving and handing it over
    #[arg(long)]
    pub(crate) reject: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        letter_type,
        nik,
        nama,
        reject,
    } = args;

    let portal = Portal::new(Arc::new(InMemoryStore::new()), PasswordHasher::with_cost(64, 1));
    portal
        .accounts
        .create_superuser(STAFF_NIK, "Petugas Desa", DEMO_PASSWORD)?;

    println!("Village letter portal demo");
    println!("\nCitizen registration");
    let registration = RegistrationForm {
        nama: nama.clone(),
        nik: nik.clone(),
        no_wa: "081234567890".to_string(),
        email: "warga@example.com".to_string(),
        password1: DEMO_PASSWORD.to_string(),
        password2: DEMO_PASSWORD.to_string(),
    };
    let citizen = portal.accounts.register(&registration)?;
    println!("- Registered {citizen}");

    let mut auth = sign_in(&portal, &nik)?;
    println!("- Logged in, session {}", auth.token.as_str());

    println!("\nLetter request wizard");
    let choices = portal.submissions.letter_types();
    println!("- {} letter types on offer", choices.len());
    let chosen = match portal.submissions.choose_type(&mut auth, &letter_type) {
        Ok(chosen) => chosen,
        Err(SubmissionError::UnknownLetterType(raw)) => {
            println!("  Unknown letter type '{raw}'. Choose one of:");
            for choice in choices {
                println!("    - {} ({})", choice.code, choice.label);
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("- Chose {chosen}");

    let form = portal.submissions.form(&auth, &letter_type)?;
    println!(
        "- {} form with {} fields: {}",
        form.letter_label,
        form.fields.len(),
        form.fields
            .iter()
            .map(|field| field.name)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let data = LetterFormData {
        tempat_lahir: "Bandung".to_string(),
        tanggal_lahir: "2000-01-01".to_string(),
        jenis_kelamin: "P".to_string(),
        pekerjaan: "Mahasiswa".to_string(),
        alamat: "Jl. Contoh No. 1".to_string(),
        kewarganegaraan: "WNI".to_string(),
        agama: "ISLAM".to_string(),
        status_pernikahan: "BELUM_MENIKAH".to_string(),
        ..form.initial
    };
    portal.submissions.fill(&mut auth, &letter_type, &data)?;
    let verification = portal.submissions.verification(&auth)?;
    println!(
        "- Verifying {} / {} at {}",
        verification.initial.nama, verification.initial.nik, verification.initial.alamat
    );

    let request = portal
        .submissions
        .verify(&mut auth, &verification.initial)?;
    print_request("Submitted", &request);

    println!("\nStaff review");
    let queue = portal.review.requests(&RequestQuery {
        status: Some(RequestStatus::Diproses),
        ..RequestQuery::default()
    })?;
    println!("- {} request(s) waiting for review", queue.len());

    let steps: &[RequestStatus] = if reject {
        &[RequestStatus::Ditolak]
    } else {
        &[RequestStatus::Disetujui, RequestStatus::TelahDiambil]
    };
    for status in steps {
        let change = portal.review.change_status(request.id, *status)?;
        print_request("Updated", &change.request);
        match change.notification {
            Some(notification) => println!(
                "  Citizen notified: {} | {}",
                notification.title, notification.message
            ),
            None => println!("  No notification for this status"),
        }
    }

    println!("\nCitizen status page");
    for request in portal.submissions.history(&auth)? {
        print_request("Request", &request);
    }
    let dashboard = portal.submissions.dashboard(&auth)?;
    println!(
        "- {} open request(s) | {} unread notification(s)",
        dashboard.open_requests, dashboard.unread_notifications
    );

    println!("\nCSV export");
    print!("{}", portal.review.export_csv(&RequestQuery::default())?);

    Ok(())
}

fn sign_in(portal: &Portal<InMemoryStore>, nik: &str) -> Result<AuthSession, AppError> {
    let grant = portal.accounts.login(&LoginForm {
        nik: nik.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    portal
        .accounts
        .resolve(&grant.token)?
        .ok_or(AppError::Account(AccountError::InvalidCredentials))
}

fn print_request(verb: &str, request: &LetterRequest) {
    println!(
        "- {verb} #{} {} -> {} ({})",
        request.id.0,
        request.letter_label(),
        request.status_label(),
        request.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(letter_type: &str) -> DemoArgs {
        DemoArgs {
            letter_type: letter_type.to_string(),
            nik: "3201234501010003".to_string(),
            nama: "Naswa Malika".to_string(),
            reject: false,
        }
    }

    #[test]
    fn demo_runs_every_letter_type() {
        for code in ["SKTM", "DOMISILI", "BELUM_MENIKAH", "SKCK"] {
            run_demo(args(code)).expect("demo completes");
        }
    }

    #[test]
    fn demo_can_reject_the_request() {
        run_demo(DemoArgs {
            reject: true,
            ..args("SKTM")
        })
        .expect("demo completes");
    }

    #[test]
    fn unknown_letter_type_lists_the_choices() {
        run_demo(args("SURAT_SAKTI")).expect("demo stops early without failing");
    }

    #[test]
    fn invalid_nik_fails_registration() {
        let result = run_demo(DemoArgs {
            nik: "12345".to_string(),
            ..args("SKTM")
        });
        assert!(matches!(result, Err(AppError::Account(_))));
    }
}
