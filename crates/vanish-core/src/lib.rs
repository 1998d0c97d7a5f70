//! # vanish-core
//!
//! Core crate for Vanish. Contains configuration schemas, the unified error
//! system, the short-id newtype, access-deny reasons, and the collaborator
//! traits (blob store, clock, id generator) that the lifecycle engine is
//! written against.
//!
//! This crate has **no** internal dependencies on other Vanish crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
