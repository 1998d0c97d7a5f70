//! Shared domain types used across crates.

pub mod access;
pub mod id;

pub use access::DenyReason;
pub use id::ShortId;
