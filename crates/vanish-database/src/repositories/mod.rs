//! PostgreSQL-backed store implementations.

pub mod content;
