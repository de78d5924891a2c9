//! API response models for the operational endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    /// Name of the service answering (`edge` or `enrichment`)
    pub service: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Identity of the running service, registered as app data
#[derive(Clone, Copy, Debug)]
pub struct ServiceInfo {
    pub name: &'static str,
}
