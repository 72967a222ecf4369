//! `gpupload-config`: runtime configuration for the gpupload host.
//!
//! Provides:
//! - Typed config schema (logging, HTTP transport)
//! - YAML read/write with backup rotation
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{GpUploadConfig, LoggingConfig, TransportConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Load, substitute env vars, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<GpUploadConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config)
}

fn prepare(raw_config: GpUploadConfig) -> Result<GpUploadConfig> {
    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: GpUploadConfig =
        serde_json::from_value(value).context("Failed to deserialize prepared config")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for w in &report.warnings {
        warn!("{}", w);
    }
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config:\n{}", errors.join("\n"));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_fills_defaults() {
        let config = prepare(GpUploadConfig::default()).unwrap();
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.timeout_secs(), None);
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let config = GpUploadConfig {
            transport: Some(TransportConfig {
                timeout_secs: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = prepare(config).unwrap_err();
        assert!(err.to_string().contains("transport.timeoutSecs"));
    }
}
