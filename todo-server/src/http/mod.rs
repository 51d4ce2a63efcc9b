//! HTTP server layer
//!
//! Axum server with:
//! - CORS (configured origins, credentials allowed)
//! - Request tracing
//! - Graceful shutdown
//! - Problem-details JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, ProblemDetails};
pub use server::{build_router, run_server};
