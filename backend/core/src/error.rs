use serde_json::{json, Value};
use thiserror::Error;

/// Failure of an upload, raised while decoding its inputs or reported by an
/// [`UploadTransport`](crate::UploadTransport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Host inputs could not be decoded; no request was sent.
    #[error("invalid activity inputs: {0}")]
    Inputs(String),


    /// The request never produced a response (connection refused, reset, DNS, ...).
    #[error("{0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    Decode(String),

    /// An ArcGIS-style `{"error": {...}}` body, usually delivered with HTTP 200.
    #[error("{message} (code {code})")]
    Service {
        code: i64,
        message: String,
        details: Vec<Value>,
    },
}

impl TransportError {
    /// Short tag naming the variant, stable for workflow authors to branch on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inputs(_) => "input",
            Self::Request(_) => "request",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Service { .. } => "service",
        }
    }

    /// Render the error as the JSON object placed in an activity's `result` output.
    pub fn to_result_value(&self) -> Value {
        let mut value = json!({
            "name": "Error",
            "message": self.to_string(),
            "kind": self.kind(),
        });
        match self {
            Self::Status { status, .. } => {
                value["status"] = json!(status);
            }
            Self::Service { code, details, .. } => {
                value["code"] = json!(code);
                value["details"] = json!(details);
            }
            Self::Inputs(_) | Self::Request(_) | Self::Decode(_) => {}
        }
        value
    }
}

/// Internal faults surfaced by [`Activity::execute`](crate::Activity::execute).
///
/// Upload failures, including undecodable inputs, are never reported here;
/// they travel as data in the outputs.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_message_is_the_raw_cause() {
        let err = TransportError::Request("ECONNRESET".into());
        let value = err.to_result_value();
        assert_eq!(value["name"], "Error");
        assert_eq!(value["message"], "ECONNRESET");
        assert_eq!(value["kind"], "request");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn status_error_carries_status_code() {
        let err = TransportError::Status {
            status: 502,
            body: "Bad Gateway".into(),
        };
        let value = err.to_result_value();
        assert_eq!(value["status"], 502);
        assert_eq!(value["message"], "HTTP 502: Bad Gateway");
    }

    #[test]
    fn service_error_carries_code_and_details() {
        let err = TransportError::Service {
            code: 400,
            message: "Unable to complete operation.".into(),
            details: vec![json!("Upload failed"), json!({"field": "file"})],
        };
        let value = err.to_result_value();
        assert_eq!(value["kind"], "service");
        assert_eq!(value["code"], 400);
        assert_eq!(value["details"][0], "Upload failed");
        assert_eq!(value["details"][1]["field"], "file");
    }

    #[test]
    fn input_error_is_tagged_as_input() {
        let err = TransportError::Inputs("missing field `url`".into());
        let value = err.to_result_value();
        assert_eq!(value["name"], "Error");
        assert_eq!(value["kind"], "input");
        assert_eq!(value["message"], "invalid activity inputs: missing field `url`");
    }
}
