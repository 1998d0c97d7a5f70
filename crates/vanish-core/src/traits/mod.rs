//! Collaborator traits defined in `vanish-core` and implemented by other crates.

pub mod clock;
pub mod id;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id::IdGenerator;
pub use storage::{BlobDeleteOutcome, BlobMetadata, BlobStore};
