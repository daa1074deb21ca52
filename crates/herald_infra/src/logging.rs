use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter variable, e.g. `HERALD_LOG=herald_services=debug`.
pub const LOG_FILTER_VAR: &str = "HERALD_LOG";

/// Installs the global subscriber: human-readable lines on stdout and the
/// same events appended to `log_dir/file_name`.
///
/// Events are flushed to the file until the returned guard is dropped, so
/// keep it alive for the whole run.
pub fn init_tracing(log_dir: &Path, file_name: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()?;

    Ok(guard)
}
