use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialise logging into `<dir>/project-launcher.log`. The TUI owns the
/// terminal, so nothing may ever print to stdout or stderr while the session
/// runs. The level defaults to `info` and can be raised via `RUST_LOG`.
///
/// The returned guard must be held for the lifetime of the process; dropping
/// it flushes and stops the writer.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, "project-launcher.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Some(guard)
}
