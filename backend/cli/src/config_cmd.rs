//! `gpupload config`: show or initialize the config file.
//!
//! These commands work on the file as written: `${VAR}` references are never
//! resolved here, and a file that fails to load can still be replaced.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Subcommand;
use gpupload_config::{apply_all_defaults, load_config, write_config, GpUploadConfig};
use tracing::warn;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file with defaults filled in, as YAML
    Show,
    /// Write the config file with defaults filled in
    Init {
        /// Overwrite an existing file (the old one is kept as a backup)
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(cmd: ConfigCommands, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = apply_all_defaults(load_config(path).await?);
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigCommands::Init { force } => {
            init(path, force).await?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    let raw = match load_config(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Replacing unreadable config with defaults");
            GpUploadConfig::default()
        }
    };
    write_config(&apply_all_defaults(raw), path).await
}
