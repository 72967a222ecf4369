pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

pub use error::{ActivityError, TransportError};
pub use registry::ActivityRegistry;
pub use traits::{Activity, UploadTransport};
pub use types::{ActivityMetadata, FieldMetadata, FileInput, FormPart, UploadForm};
