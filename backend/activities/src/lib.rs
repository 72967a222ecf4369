pub mod gp_file_upload;
pub mod transport;

pub use gp_file_upload::{GpFileUpload, GpFileUploadInputs, GpFileUploadOutputs, UploadOutcome};
pub use transport::{HttpUploadTransport, TransportSettings};
