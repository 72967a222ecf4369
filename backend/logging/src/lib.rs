//! Structured logging setup for gpupload.

pub mod logger;

pub use logger::init_logger;
