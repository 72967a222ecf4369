//! Structured Logger
//!
//! Wraps `tracing` with a console layer (text or JSON) and a daily rolling
//! NDJSON file, with `RUST_LOG` overriding the configured level.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "gpupload";

/// Initialize the global logger.
///
/// Console output goes to stderr so stdout stays free for activity outputs.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str, json: bool) -> Result<()> {
    let log_dir = log_dir.as_ref();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Writes NDJSON to `<log_dir>/gpupload.YYYY-MM-DD.log`
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to open log directory: {}", log_dir.display()))?;

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let json_console = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(text_console)
        .with(file_layer)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_dir_and_is_idempotent() {
        let dir = std::env::temp_dir().join(format!("gpupload-logs-{}", uuid::Uuid::new_v4()));
        init_logger(&dir, "debug", false).unwrap();
        init_logger(&dir, "info", true).unwrap();
        tracing::info!("logger smoke test");
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).ok();
    }
}
