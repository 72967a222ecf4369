use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ActivityError, TransportError};
use crate::types::{ActivityMetadata, UploadForm};

/// Issues multipart POST requests on behalf of an activity.
///
/// Authentication, base URL resolution and similar session concerns belong
/// to the implementation, not to the activity calling it.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// POST `form` to `url` with `params` as query parameters and decode the JSON body.
    async fn post_multipart(
        &self,
        url: &str,
        form: UploadForm,
        params: &[(&str, &str)],
    ) -> Result<Value, TransportError>;
}

/// A unit of work a workflow host can invoke by its action identifier.
#[async_trait]
pub trait Activity: Send + Sync {
    /// Registration data shown by the designer.
    fn metadata(&self) -> &ActivityMetadata;

    /// Published unique identifier of the activity.
    fn action(&self) -> &str {
        &self.metadata().action
    }

    /// Published identifier of the suite the activity belongs to.
    fn suite(&self) -> &str {
        &self.metadata().suite
    }

    /// Execute with host-supplied inputs, returning host-facing outputs.
    ///
    /// Upload failures, undecodable inputs included, come back as `Ok` outputs.
    /// `Err` is reserved for internal faults.
    async fn execute(&self, inputs: Value) -> Result<Value, ActivityError>;
}
