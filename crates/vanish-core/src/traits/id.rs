//! Short-id generation trait.

use crate::types::id::ShortId;

/// Produces fresh, unguessable short ids.
///
/// Collisions must be negligible by construction; the lifecycle engine still
/// retries a bounded number of times if the store reports one.
pub trait IdGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a new id.
    fn generate(&self) -> ShortId;
}
