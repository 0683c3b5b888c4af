use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use surat_desa::config::BootstrapAdmin;
use surat_desa::portal::{AccountError, Portal, PortalStore, RepositoryError};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed the configured staff account. An existing account with the same NIK is left as is.
pub(crate) fn bootstrap_admin<S>(
    portal: &Portal<S>,
    admin: &BootstrapAdmin,
) -> Result<(), AccountError>
where
    S: PortalStore,
{
    match portal
        .accounts
        .create_superuser(&admin.nik, &admin.nama, &admin.password)
    {
        Ok(user) => {
            info!(user_id = user.id.0, nik = %user.nik, "bootstrap staff account created");
            Ok(())
        }
        Err(AccountError::Repository(RepositoryError::Conflict)) => {
            warn!(nik = %admin.nik, "bootstrap staff account already exists");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
