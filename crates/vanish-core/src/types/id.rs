//! Newtype wrapper for the short, unguessable content identifier.
//!
//! A [`ShortId`] is the only credential needed to reach a record that has no
//! password, so ids are drawn from a wide URL-safe alphabet and must be at
//! least [`ShortId::MIN_LEN`] characters long.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// URL-safe alphabet ids are drawn from (64 symbols).
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Unique short identifier of a content record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortId(String);

impl ShortId {
    /// Minimum accepted id length.
    pub const MIN_LEN: usize = 10;
    /// Maximum accepted id length.
    pub const MAX_LEN: usize = 64;

    /// Parse and validate an id.
    pub fn parse(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        if value.len() < Self::MIN_LEN || value.len() > Self::MAX_LEN {
            return Err(AppError::validation(format!(
                "Short id must be {}..={} characters, got {}",
                Self::MIN_LEN,
                Self::MAX_LEN,
                value.len()
            )));
        }
        if !value.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(AppError::validation(
                "Short id contains characters outside the URL-safe alphabet",
            ));
        }
        Ok(Self(value))
    }

    /// Wrap an id produced by a generator drawing from [`ALPHABET`].
    ///
    /// Debug builds still check the invariant.
    pub fn from_generated(value: String) -> Self {
        debug_assert!(Self::parse(value.clone()).is_ok(), "generated id is invalid");
        Self(value)
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShortId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ShortId> for String {
    fn from(id: ShortId) -> String {
        id.0
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
