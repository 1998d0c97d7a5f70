//! # vanish-service
//!
//! Content lifecycle and access control. The [`access`] guard is a pure
//! decision function, the [`lifecycle`] engine owns every state transition
//! of a record on top of the content store, and [`content`] composes both
//! with the blob store into the operations the transport exposes.
//!
//! Services follow constructor injection: the shared store, blob store and
//! clock are passed in as `Arc` handles, never reached through globals.

pub mod access;
pub mod content;
pub mod lifecycle;

pub use access::{AccessDecision, decide, decide_download};
pub use content::{
    ContentMetadata, ContentService, CreateContentRequest, FileDownload, MAX_VIEWS_LIMIT,
    RandomIdGenerator, UploadedFile,
};
pub use lifecycle::{DeleteCause, LifecycleEngine, SoftDeleteOutcome};
