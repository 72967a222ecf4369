//! `gpupload activities`: describe registered activities.

use anyhow::Result;
use gpupload_core::{ActivityMetadata, ActivityRegistry};

pub fn run(registry: &ActivityRegistry, suite: Option<&str>) -> Result<()> {
    let listed = select(registry, suite);
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}

fn select(registry: &ActivityRegistry, suite: Option<&str>) -> Vec<ActivityMetadata> {
    match suite {
        Some(suite) => registry.suite(suite),
        None => registry
            .list()
            .iter()
            .filter_map(|action| registry.get(action))
            .map(|a| a.metadata().clone())
            .collect(),
    }
}
