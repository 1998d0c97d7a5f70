//! Content lifecycle policy configuration.

use serde::{Deserialize, Serialize};

/// Limits and defaults applied when content is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Expiry applied when the creator does not choose one, in minutes.
    #[serde(default = "default_expiry_minutes")]
    pub default_expiry_minutes: u64,
    /// Maximum size of inline text content in bytes.
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
    /// Minimum length of an access password.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    /// Length of generated short ids.
    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_expiry_minutes: default_expiry_minutes(),
            max_text_bytes: default_max_text_bytes(),
            min_password_length: default_min_password_length(),
            id_length: default_id_length(),
        }
    }
}

impl ContentConfig {
    /// The default time-to-live as a chrono duration.
    pub fn default_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.default_expiry_minutes as i64)
    }
}

fn default_expiry_minutes() -> u64 {
    10
}

fn default_max_text_bytes() -> usize {
    1_000_000
}

fn default_min_password_length() -> usize {
    4
}

fn default_id_length() -> usize {
    10
}
