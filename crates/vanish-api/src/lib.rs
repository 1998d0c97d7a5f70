//! # vanish-api
//!
//! HTTP API layer for Vanish built on Axum.
//!
//! Provides the content, cleanup and health endpoints, request logging and
//! CORS middleware, request/response DTOs, and the mapping from `AppError`
//! to HTTP status codes.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
