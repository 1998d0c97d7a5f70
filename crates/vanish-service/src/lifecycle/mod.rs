//! Record state transitions.

pub mod engine;

pub use engine::{DeleteCause, LifecycleEngine, SoftDeleteOutcome};
