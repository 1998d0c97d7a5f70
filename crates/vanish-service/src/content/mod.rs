//! Content operations exposed to the transport layer.

pub mod id;
pub mod service;

pub use id::RandomIdGenerator;
pub use service::{
    ContentMetadata, ContentService, CreateContentRequest, FileDownload, MAX_VIEWS_LIMIT,
    UploadedFile,
};
