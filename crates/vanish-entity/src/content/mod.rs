//! Content domain entities.

pub mod kind;
pub mod model;
pub mod payload;

pub use kind::ContentKind;
pub use model::{ContentRecord, NewContent};
pub use payload::{FileMeta, Payload};
