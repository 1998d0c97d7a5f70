//! # vanish-entity
//!
//! Domain entity models for Vanish. The system is a flat keyed store with a
//! single entity, the content record, plus the value objects it is built
//! from and the input used to create one.

pub mod content;

pub use content::{ContentKind, ContentRecord, FileMeta, NewContent, Payload};
