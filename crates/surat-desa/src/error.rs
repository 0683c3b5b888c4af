use crate::config::ConfigError;
use crate::portal::accounts::AccountError;
use crate::portal::review::ReviewError;
use crate::portal::submission::SubmissionError;
use crate::telemetry::TelemetryError;

/// Failures surfaced by the service entrypoints (server startup, CLI demo).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("account error: {0}")]
    Account(#[from] AccountError),
    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),
    #[error("review error: {0}")]
    Review(#[from] ReviewError),
}
