//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (10 + 20 overflow connections) - no Arc<Mutex<Connection>>
//! - One pooled connection per request, returned when the session drops
//! - Rely on DB constraints and single-statement writes - no check-then-write
//! - No retries: infrastructure errors surface to the caller

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::create_pool;
pub use repos::*;
