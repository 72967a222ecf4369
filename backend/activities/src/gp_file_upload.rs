//! GPFileUpload: uploads a file to a Geoprocessing service `uploads/upload` endpoint.
//!
//! The activity never fails: undecodable inputs, transport errors and service
//! rejections come back as data in `result` with an empty `itemID`, so
//! workflow authors branch on the outputs instead of on errors.

use std::sync::Arc;

use async_trait::async_trait;
use gpupload_core::{
    Activity, ActivityError, ActivityMetadata, FieldMetadata, FileInput, TransportError,
    UploadForm, UploadTransport,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

/// Published action identifier. Never change once released.
pub const ACTION: &str = "uuid:9386f870-62d2-42a6-a7ea-41986905f3ea::GPFileUpload";

/// Published suite identifier. Never change once released.
pub const SUITE: &str = "uuid:9386f870-62d2-42a6-a7ea-41986905f3ea";

/// Multipart field the upload endpoint reads the file from.
pub const FILE_FIELD: &str = "file";

/// Asks the REST endpoint for a (pretty) JSON response.
pub const RESPONSE_FORMAT_PARAM: (&str, &str) = ("f", "pjson");

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpFileUploadInputs {
    pub file: FileInput,
    pub url: String,
}

/// Either the decoded service response or the transport failure.
pub type UploadOutcome = Result<Value, TransportError>;

/// Outputs of one upload.
///
/// Serializes to the host shape `{ "result": ..., "itemID": "..." }`.
#[derive(Debug, Clone)]
pub struct GpFileUploadOutputs {
    pub outcome: UploadOutcome,
    pub item_id: String,
}

impl GpFileUploadOutputs {
    /// The value published as `result`: the full response, or the error object.
    pub fn result_value(&self) -> Value {
        match &self.outcome {
            Ok(response) => response.clone(),
            Err(err) => err.to_result_value(),
        }
    }
}

impl Serialize for GpFileUploadOutputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("GpFileUploadOutputs", 2)?;
        out.serialize_field("result", &self.result_value())?;
        out.serialize_field("itemID", &self.item_id)?;
        out.end()
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

pub struct GpFileUpload {
    transport: Arc<dyn UploadTransport>,
    metadata: ActivityMetadata,
}

impl GpFileUpload {
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            transport,
            metadata: metadata(),
        }
    }

    /// Build the multipart body: a single `file` part.
    pub fn upload_form(file: &FileInput) -> UploadForm {
        UploadForm::single_file(FILE_FIELD, file)
    }

    /// Issue the single POST to the upload endpoint.
    pub async fn upload_file(&self, url: &str, form: UploadForm) -> UploadOutcome {
        self.transport
            .post_multipart(url, form, &[RESPONSE_FORMAT_PARAM])
            .await
    }

    /// Upload `inputs.file` to `inputs.url` and map the outcome to outputs.
    pub async fn run(&self, inputs: GpFileUploadInputs) -> GpFileUploadOutputs {
        info!(
            url = %inputs.url,
            file = %inputs.file.name,
            bytes = inputs.file.len(),
            "[GPFileUpload] Uploading file"
        );

        let form = Self::upload_form(&inputs.file);
        let outcome = self.upload_file(&inputs.url, form).await;

        let item_id = match &outcome {
            Ok(response) if is_success(response) => match item_id_of(response) {
                Some(id) => {
                    info!(item_id = %id, "[GPFileUpload] Upload succeeded");
                    id
                }
                None => {
                    warn!("[GPFileUpload] Service reported success without item.itemID");
                    String::new()
                }
            },
            Ok(_) => {
                warn!(url = %inputs.url, "[GPFileUpload] Service rejected upload");
                String::new()
            }
            Err(err) => {
                warn!(url = %inputs.url, kind = err.kind(), error = %err, "[GPFileUpload] Upload failed");
                String::new()
            }
        };

        GpFileUploadOutputs { outcome, item_id }
    }
}

#[async_trait]
impl Activity for GpFileUpload {
    fn metadata(&self) -> &ActivityMetadata {
        &self.metadata
    }

    async fn execute(&self, inputs: Value) -> Result<Value, ActivityError> {
        let outputs = match serde_json::from_value::<GpFileUploadInputs>(inputs) {
            Ok(inputs) => self.run(inputs).await,
            Err(e) => {
                warn!(error = %e, "[GPFileUpload] Invalid inputs; nothing uploaded");
                GpFileUploadOutputs {
                    outcome: Err(TransportError::Inputs(e.to_string())),
                    item_id: String::new(),
                }
            }
        };
        Ok(serde_json::to_value(&outputs).map_err(anyhow::Error::from)?)
    }
}

fn metadata() -> ActivityMetadata {
    ActivityMetadata {
        action: ACTION.to_string(),
        suite: SUITE.to_string(),
        display_name: "GPFileUpload".to_string(),
        category: "Custom Activities".to_string(),
        description: "Allows users to upload a file to a Geoprocessing Service upload endpoint."
            .to_string(),
        inputs: vec![
            FieldMetadata::required("file", "The File object you want to upload."),
            FieldMetadata::required(
                "url",
                "The URL of the upload service (https://domain.com/arcgis/rest/services/<ServiceName>/GPServer/uploads/upload)",
            )
            .with_display_name("URL"),
        ],
        outputs: vec![
            FieldMetadata::optional("result", "The result of the gp service response."),
            FieldMetadata::optional("itemID", "The itemID of the file that was uploaded."),
        ],
    }
}

/// Only a JSON `true` counts as success.
fn is_success(response: &Value) -> bool {
    response.get("success").and_then(Value::as_bool) == Some(true)
}

fn item_id_of(response: &Value) -> Option<String> {
    match response.get("item")?.get("itemID")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
