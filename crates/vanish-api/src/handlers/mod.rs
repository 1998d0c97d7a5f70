//! HTTP request handlers, one module per domain.

pub mod cleanup;
pub mod content;
pub mod health;
