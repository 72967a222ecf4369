//! HTTP transport for upload activities, backed by `reqwest`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gpupload_core::{TransportError, UploadForm, UploadTransport};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("gpupload/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub user_agent: String,
    /// Whole-request timeout. `None` waits as long as the server takes.
    pub timeout: Option<Duration>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

pub struct HttpUploadTransport {
    client: Client,
}

impl HttpUploadTransport {
    pub fn new(settings: &TransportSettings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one carrying session cookies or auth headers.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadTransport for HttpUploadTransport {
    async fn post_multipart(
        &self,
        url: &str,
        form: UploadForm,
        params: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        let multipart = to_multipart(form)?;
        let resp = self
            .client
            .post(url)
            .query(params)
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        debug!(url = %url, status = status.as_u16(), "Upload response");
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: resp
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<unreadable body: {e}>")),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?;

        match service_error(&body) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }
}

fn to_multipart(form: UploadForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.parts {
        let mut p = Part::bytes(part.data);
        if let Some(file_name) = part.file_name {
            p = p.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            p = p.mime_str(&content_type).map_err(|e| {
                TransportError::Request(format!("invalid content type {content_type:?}: {e}"))
            })?;
        }
        out = out.part(part.name, p);
    }
    Ok(out)
}

/// ArcGIS REST endpoints report failures as `{"error": {"code", "message", "details"}}`,
/// typically with HTTP 200. A body carrying a `success` flag is an upload
/// response and is returned whole, whatever its `error` field holds.
fn service_error(body: &Value) -> Option<TransportError> {
    if body.get("success").is_some() {
        return None;
    }
    let err = body.get("error").filter(|e| e.is_object())?;
    Some(TransportError::Service {
        code: err["code"].as_i64().unwrap_or(0),
        message: err["message"]
            .as_str()
            .unwrap_or("Unknown service error")
            .to_string(),
        details: err["details"].as_array().cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Multipart, Query};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use crate::gp_file_upload::{GpFileUpload, GpFileUploadInputs};
    use gpupload_core::{Activity, FileInput};
    use std::sync::Arc;
    use serde_json::json;
    use std::collections::HashMap;

    async fn echo_upload(
        Query(query): Query<HashMap<String, String>>,
        mut multipart: Multipart,
    ) -> Json<Value> {
        let mut parts = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap();
            parts.push(json!({
                "name": name,
                "fileName": file_name,
                "contentType": content_type,
                "text": String::from_utf8_lossy(&data),
            }));
        }
        Json(json!({
            "success": true,
            "f": query.get("f"),
            "parts": parts,
            "item": {"itemID": "i-1"},
        }))
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/upload", post(echo_upload))
            .route(
                "/fail",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route("/html", post(|| async { "<html>not json</html>" }))
            .route(
                "/arcgis-error",
                post(|| async {
                    Json(json!({"error": {
                        "code": 400,
                        "message": "Unable to complete operation.",
                        "details": ["File type not allowed", {"field": "file"}],
                    }}))
                }),
            )
            .route(
                "/quota",
                post(|| async {
                    Json(json!({"success": false, "error": {
                        "code": 400,
                        "message": "quota exceeded",
                        "details": [{"field": "file"}],
                    }}))
                }),
            )
            .route(
                "/reject",
                post(|| async { Json(json!({"success": false, "error": "quota exceeded"})) }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn form() -> UploadForm {
        UploadForm::single_file("file", &FileInput::new("a.txt", b"hello".to_vec()))
    }

    fn transport() -> HttpUploadTransport {
        HttpUploadTransport::new(&TransportSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn posts_single_file_part_with_format_param() {
        let base = spawn_server().await;
        let body = transport()
            .post_multipart(&format!("{base}/upload"), form(), &[("f", "pjson")])
            .await
            .unwrap();

        assert_eq!(body["f"], "pjson");
        let parts = body["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["name"], "file");
        assert_eq!(parts[0]["fileName"], "a.txt");
        assert_eq!(parts[0]["text"], "hello");
    }

    #[tokio::test]
    async fn forwards_part_content_type() {
        let base = spawn_server().await;
        let file = FileInput::new("a.csv", b"x,y\n1,2".to_vec()).with_content_type("text/csv");
        let body = transport()
            .post_multipart(
                &format!("{base}/upload"),
                UploadForm::single_file("file", &file),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(body["parts"][0]["contentType"], "text/csv");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = spawn_server().await;
        let err = transport()
            .post_multipart(&format!("{base}/fail"), form(), &[])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 500,
                body: "boom".into()
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let base = spawn_server().await;
        let err = transport()
            .post_multipart(&format!("{base}/html"), form(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn arcgis_error_object_is_a_service_error() {
        let base = spawn_server().await;
        let err = transport()
            .post_multipart(&format!("{base}/arcgis-error"), form(), &[])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransportError::Service {
                code: 400,
                message: "Unable to complete operation.".into(),
                details: vec![json!("File type not allowed"), json!({"field": "file"})],
            }
        );
    }

    #[tokio::test]
    async fn string_error_field_is_passed_through() {
        let base = spawn_server().await;
        let body = transport()
            .post_multipart(&format!("{base}/reject"), form(), &[])
            .await
            .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "quota exceeded");
    }

    #[tokio::test]
    async fn refused_connection_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport()
            .post_multipart(&format!("http://{addr}/upload"), form(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[tokio::test]
    async fn invalid_content_type_is_rejected_before_sending() {
        let file = FileInput::new("a.bin", b"x".to_vec()).with_content_type("not a mime");
        let err = transport()
            .post_multipart(
                "http://127.0.0.1:1/upload",
                UploadForm::single_file("file", &file),
                &[],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid content type"));
    }

    #[tokio::test]
    async fn error_object_beside_success_flag_keeps_whole_response() {
        let base = spawn_server().await;
        let body = transport()
            .post_multipart(&format!("{base}/quota"), form(), &[])
            .await
            .unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": {
                "code": 400,
                "message": "quota exceeded",
                "details": [{"field": "file"}],
            }})
        );
    }

    #[tokio::test]
    async fn activity_uploads_over_http_end_to_end() {
        let base = spawn_server().await;
        let activity = GpFileUpload::new(Arc::new(transport()));

        let outputs = activity
            .run(GpFileUploadInputs {
                file: FileInput::new("a.txt", b"hello".to_vec()),
                url: format!("{base}/upload"),
            })
            .await;

        assert_eq!(outputs.item_id, "i-1");
        let result = outputs.result_value();
        assert_eq!(result["f"], "pjson");
        let parts = result["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["name"], "file");
        assert_eq!(parts[0]["fileName"], "a.txt");
        assert_eq!(parts[0]["text"], "hello");
    }

    #[tokio::test]
    async fn activity_execute_over_http_reports_rejection_as_data() {
        let base = spawn_server().await;
        let activity = GpFileUpload::new(Arc::new(transport()));

        let out = activity
            .execute(json!({
                "file": {"name": "a.txt", "data": "aGVsbG8="},
                "url": format!("{base}/quota"),
            }))
            .await
            .unwrap();

        assert_eq!(out["itemID"], "");
        assert_eq!(out["result"]["success"], false);
        assert_eq!(out["result"]["error"]["details"][0]["field"], "file");
    }
}
