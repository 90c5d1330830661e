// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::debug;

use crate::cache::JobCache;
use crate::web::types::{HealthResponse, ServerConfig};

pub async fn health_handler(
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> Json<HealthResponse> {
    debug!("Health check");

    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        source: cache.source_name().to_string(),
        cache_enabled: config.cache_enabled,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
