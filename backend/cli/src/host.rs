//! Wires configured transports and activities into a registry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use gpupload_activities::{GpFileUpload, HttpUploadTransport, TransportSettings};
use gpupload_config::GpUploadConfig;
use gpupload_core::{ActivityRegistry, UploadTransport};

pub fn transport_settings(config: &GpUploadConfig) -> TransportSettings {
    TransportSettings {
        user_agent: config.user_agent().to_string(),
        timeout: config.timeout_secs().map(Duration::from_secs),
    }
}

pub fn build_registry(config: &GpUploadConfig) -> Result<ActivityRegistry> {
    let transport = HttpUploadTransport::new(&transport_settings(config))?;
    Ok(registry_with(Arc::new(transport)))
}

pub fn registry_with(transport: Arc<dyn UploadTransport>) -> ActivityRegistry {
    let mut registry = ActivityRegistry::new();
    registry.register(Arc::new(GpFileUpload::new(transport)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpupload_activities::gp_file_upload::{ACTION, SUITE};
    use gpupload_config::{apply_all_defaults, TransportConfig};

    #[test]
    fn registry_exposes_upload_activity() {
        let registry = build_registry(&apply_all_defaults(GpUploadConfig::default())).unwrap();
        assert_eq!(registry.list(), vec![ACTION.to_string()]);
        assert_eq!(registry.suite(SUITE).len(), 1);
    }

    #[test]
    fn settings_follow_config() {
        let config = GpUploadConfig {
            transport: Some(TransportConfig {
                user_agent: Some("ops".into()),
                timeout_secs: Some(90),
            }),
            ..Default::default()
        };
        let settings = transport_settings(&config);
        assert_eq!(settings.user_agent, "ops");
        assert_eq!(settings.timeout, Some(Duration::from_secs(90)));
        assert_eq!(transport_settings(&GpUploadConfig::default()).timeout, None);
    }
}
