//! Config validation with field paths in every message.

use crate::schema::GpUploadConfig;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &GpUploadConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_transport(config, &mut report);
    report
}

fn validate_logging(config: &GpUploadConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.error(
                "logging.level",
                format!("Unknown log level '{level}'; expected one of {}", LOG_LEVELS.join(", ")),
            );
        }
    }
    if logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("logging.dir", "Log directory must not be empty");
    }
}

fn validate_transport(config: &GpUploadConfig, report: &mut ValidationReport) {
    let Some(transport) = &config.transport else { return };
    if transport.timeout_secs == Some(0) {
        report.error(
            "transport.timeoutSecs",
            "Timeout must be at least 1 second; omit it to wait indefinitely",
        );
    }
    if transport
        .user_agent
        .as_deref()
        .is_some_and(|ua| ua.trim().is_empty())
    {
        report.warn("transport.userAgent", "Empty User-Agent; some servers reject such requests");
    }
}
