use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::config::Settings;
use crate::types::dto::common::HealthResponse;

/// Health check API
pub struct HealthApi {
    settings: Arc<Settings>,
}

impl HealthApi {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

/// API tags for health endpoints
#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Health check endpoint
    ///
    /// Returns the current status of the API service
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_string(),
            site_name: self.settings.site_name().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
