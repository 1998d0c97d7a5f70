//! Random short-id generation.

use vanish_core::traits::IdGenerator;
use vanish_core::types::ShortId;
use vanish_core::types::id::ALPHABET;

/// Generates ids from the 64-symbol URL-safe alphabet using the thread-local
/// CSPRNG. Ten symbols give 60 bits of entropy.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    /// Create a generator producing ids of `length` symbols, clamped to the
    /// accepted id length range.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(ShortId::MIN_LEN, ShortId::MAX_LEN),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(ShortId::MIN_LEN)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> ShortId {
        let raw: String = (0..self.length)
            .map(|_| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortId::from_generated(raw)
    }
}
