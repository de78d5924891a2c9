//! HTTP request handlers for both services.
//!
//! The `edge` and `enrichment` modules hold the pipeline handlers; the
//! remaining modules serve health, version and metrics on either service.

pub mod edge;
pub mod enrichment;
pub mod error;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod version;

pub use edge::EdgeState;
pub use enrichment::EnrichmentState;
pub use error::PipelineError;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use version::*;
