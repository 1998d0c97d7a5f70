//! # vanish-storage
//!
//! Blob store implementations for file content. Records only ever hold the
//! opaque location handle a provider returns from `put`; the bytes live here.

pub mod factory;
pub mod keys;
pub mod mime;
pub mod providers;

pub use factory::build_blob_store;
pub use keys::{blob_key, sanitize_file_name};
pub use providers::LocalBlobStore;
