//! Docscan Infrastructure Library
//!
//! Shared infrastructure for the docscan API:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{get_request_id, request_id_middleware, security_headers_middleware, RequestId};
pub use telemetry::{init_telemetry, shutdown_telemetry};
