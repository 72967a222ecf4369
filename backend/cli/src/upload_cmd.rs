//! `gpupload upload`: run the GPFileUpload activity once.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use gpupload_activities::gp_file_upload::ACTION;
use gpupload_core::{ActivityRegistry, FileInput};
use serde_json::{json, Value};
use tracing::info;

#[derive(Args)]
pub struct UploadArgs {
    /// File to upload
    #[arg(short, long)]
    pub file: PathBuf,
    /// Upload endpoint, e.g. https://host/arcgis/rest/services/<Name>/GPServer/uploads/upload
    #[arg(short, long)]
    pub url: String,
    /// MIME type for the file part
    #[arg(long)]
    pub content_type: Option<String>,
}

pub async fn run(registry: &ActivityRegistry, args: UploadArgs) -> Result<()> {
    let mut file = FileInput::from_path(&args.file).await?;
    file.content_type = args.content_type;

    let outputs = execute_upload(registry, file, &args.url).await?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

/// Hand the inputs to the registered activity the way a workflow host would.
pub async fn execute_upload(
    registry: &ActivityRegistry,
    file: FileInput,
    url: &str,
) -> Result<Value> {
    let activity = registry
        .get(ACTION)
        .with_context(|| format!("Activity not registered: {ACTION}"))?;
    let inputs = json!({ "file": file, "url": url });
    let outputs = activity.execute(inputs).await?;
    info!(item_id = %outputs["itemID"], "Activity finished");
    Ok(outputs)
}
