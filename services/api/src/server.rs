use crate::cli::ServeArgs;
use crate::infra::{bootstrap_admin, AppState};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use surat_desa::config::AppConfig;
use surat_desa::error::AppError;
use surat_desa::portal::{InMemoryStore, PasswordHasher, Portal};
use surat_desa::telemetry;
use tracing::info;

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.server.host = args.host.unwrap_or(config.server.host);
    config.server.port = args.port.unwrap_or(config.server.port);

    telemetry::init(&config.telemetry)?;

    let portal = Arc::new(Portal::new(
        Arc::new(InMemoryStore::new()),
        PasswordHasher::with_cost(
            config.security.password_memory_kib,
            config.security.password_iterations,
        ),
    ));
    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_admin(&portal, admin)?;
    }

    let (metrics_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness.clone(),
        metrics: Arc::new(metrics_handle),
    };
    let app = with_portal_routes(portal)
        .layer(Extension(state))
        .layer(metrics_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);
    info!(
        environment = ?config.environment,
        %addr,
        password_iterations = config.security.password_iterations,
        password_memory_kib = config.security.password_memory_kib,
        "village letter portal listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
