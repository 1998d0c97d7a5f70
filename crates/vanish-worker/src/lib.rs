//! Background reclamation for Vanish.
//!
//! This crate provides:
//! - The [`Sweeper`], which drives expired records into the Deleted state
//!   and releases their blobs
//! - The [`SweepRunner`], which runs a sweep on a fixed period until the
//!   process shuts down

pub mod runner;
pub mod sweeper;

pub use runner::SweepRunner;
pub use sweeper::{SweepReport, Sweeper};
