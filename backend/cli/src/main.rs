mod activities_cmd;
mod config_cmd;
mod host;
mod upload_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use gpupload_config::{
    apply_all_defaults, config_dir, config_file_path, load_and_prepare, GpUploadConfig,
};

#[derive(Parser)]
#[command(name = "gpupload")]
#[command(about = "Upload files to ArcGIS Geoprocessing service upload endpoints")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.gpupload/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and print the activity outputs as JSON
    Upload(upload_cmd::UploadArgs),
    /// List registered activities
    Activities {
        /// Only show activities of this suite
        #[arg(long)]
        suite: Option<String>,
    },
    /// Inspect or initialize the config file
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Upload(args) => {
            let config = prepare(&config_path).await?;
            let registry = host::build_registry(&config)?;
            upload_cmd::run(&registry, args).await?;
        }
        Commands::Activities { suite } => {
            let config = prepare(&config_path).await?;
            let registry = host::build_registry(&config)?;
            activities_cmd::run(&registry, suite.as_deref())?;
        }
        Commands::Config(cmd) => {
            let defaults = apply_all_defaults(GpUploadConfig::default());
            gpupload_logging::init_logger(
                defaults.log_dir(),
                defaults.log_level(),
                defaults.log_json(),
            )?;
            config_cmd::run(cmd, &config_path).await?;
        }
    }

    Ok(())
}

/// Load the resolved, validated config and start logging from it.
async fn prepare(config_path: &Path) -> Result<GpUploadConfig> {
    let config = load_and_prepare(config_path).await?;
    gpupload_logging::init_logger(config.log_dir(), config.log_level(), config.log_json())?;
    debug!(path = %config_path.display(), "Using config");
    Ok(config)
}
