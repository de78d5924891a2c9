//! Middleware shared by both services: request IDs with access logging,
//! and Prometheus request metrics.

pub mod metrics;
pub mod request_id;

pub use metrics::*;
pub use request_id::*;
