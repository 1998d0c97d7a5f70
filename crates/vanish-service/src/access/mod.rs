//! Access control for content reads.

pub mod guard;

pub use guard::{AccessDecision, decide, decide_download, gone_reason};
