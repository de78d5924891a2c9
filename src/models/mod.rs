//! Data models shared by both services.
//!
//! `cep` holds the pipeline's wire formats; `api` holds the bodies of the
//! health and version endpoints.

pub mod api;
pub mod cep;

pub use api::*;
pub use cep::*;
