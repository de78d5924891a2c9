//! Configuration structures and loading utilities.
//!
//! Every structure loads from environment variables with a default for
//! each unset or unparsable value.

pub mod metrics;
pub mod service;
pub mod telemetry;

pub use metrics::*;
pub use service::*;
pub use telemetry::*;
