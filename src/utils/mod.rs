//! Utility functions shared by middleware and handlers.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
