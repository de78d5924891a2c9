//! Business logic and service layer modules.
//!
//! Input validation, unit conversion, and the traced clients for the
//! enrichment service and the two external providers.

pub mod address;
pub mod enrichment;
pub mod http_client;
pub mod metrics;
pub mod temperature;
pub mod validation;
pub mod weather;

pub use address::*;
pub use enrichment::*;
pub use http_client::{LookupError, TracedClient, UpstreamResponse};
pub use metrics::*;
pub use temperature::*;
pub use validation::*;
pub use weather::*;
