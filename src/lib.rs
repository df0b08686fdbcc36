pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

pub use crate::commands::ClientError;
pub use crate::config::AppSettings;
pub use crate::errors::{AppError, AppResult};
pub use crate::models::{DeleteResponse, Evaluation, EvaluationSummary, SaveResponse};
pub use crate::store::RecordStore;

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Installs the global subscriber: JSON lines to a daily file when `log_dir`
/// is set, plain text on stderr otherwise. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<(), String> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(log_dir) = log_dir else {
        return tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| error.to_string());
    };

    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "health-eval.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}
