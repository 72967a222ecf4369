//! Config defaults: applies default values to a parsed config.

use crate::schema::{GpUploadConfig, LoggingConfig, TransportConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log directory name, relative to the config directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_USER_AGENT: &str = concat!("gpupload/", env!("CARGO_PKG_VERSION"));

/// Apply all defaults to a freshly loaded config.
///
/// `logging.dir` stays unset so the log directory follows the config directory.
pub fn apply_all_defaults(config: GpUploadConfig) -> GpUploadConfig {
    let config = apply_logging_defaults(config);
    apply_transport_defaults(config)
}

fn apply_logging_defaults(mut config: GpUploadConfig) -> GpUploadConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

/// The timeout stays unset: uploads wait for the server unless configured.
fn apply_transport_defaults(mut config: GpUploadConfig) -> GpUploadConfig {
    let transport = config.transport.get_or_insert_with(TransportConfig::default);
    if transport.user_agent.is_none() {
        transport.user_agent = Some(DEFAULT_USER_AGENT.to_string());
    }
    config
}
