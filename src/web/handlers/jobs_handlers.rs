// src/web/handlers/jobs_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

use crate::cache::JobCache;
use crate::error::JobsError;
use crate::utils::{parse_limit, parse_limit_value};
use crate::web::types::{
    ApiResponse, ErrorResponse, JobsRequest, JobsResponse, ServerConfig, PASSTHROUGH_CACHE_CONTROL,
};

pub type JobsResult = Result<ApiResponse<JobsResponse>, ApiResponse<ErrorResponse>>;

pub async fn get_jobs_handler(
    role: Option<String>,
    location: Option<String>,
    limit: Option<String>,
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> JobsResult {
    let limit = limit.as_deref().and_then(parse_limit);
    serve_jobs(role.as_deref(), location.as_deref(), limit, cache, config).await
}

pub async fn post_jobs_handler(
    request: Option<Json<JobsRequest>>,
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> JobsResult {
    let request = match request {
        Some(Json(request)) => request,
        None => {
            warn!("POST /jobs without a readable JSON body, using defaults");
            JobsRequest::default()
        }
    };

    let limit = request.limit.as_ref().and_then(parse_limit_value);
    serve_jobs(
        request.role(),
        request.location.as_deref(),
        limit,
        cache,
        config,
    )
    .await
}

pub async fn method_not_allowed_handler(method: &str) -> ApiResponse<ErrorResponse> {
    let err = JobsError::InvalidInput(format!("Method {} is not supported on /jobs", method));
    warn!("{}", err);

    ApiResponse::new(
        rocket::http::Status::MethodNotAllowed,
        ErrorResponse::new("Method not allowed", err.upstream_message(), err.error_code()),
    )
    .with_header("Allow", "GET, POST, OPTIONS")
}

async fn serve_jobs(
    role: Option<&str>,
    location: Option<&str>,
    limit: Option<i64>,
    cache: &JobCache,
    config: &ServerConfig,
) -> JobsResult {
    let role = role.unwrap_or_default();
    let location = location.unwrap_or_default();

    info!(
        "Jobs requested: role='{}' location='{}' limit={:?}",
        role, location, limit
    );

    let result = if config.cache_enabled {
        cache.get(role, location, limit).await
    } else {
        cache.fetch_uncached(role, location, limit).await
    };

    match result {
        Ok(batch) => {
            if let Some(warning) = &batch.warning {
                warn!("Serving degraded jobs response: {}", warning);
            }

            let response = ApiResponse::ok(JobsResponse::from(batch));
            Ok(if config.cache_enabled {
                response
            } else {
                response.with_header("Cache-Control", PASSTHROUGH_CACHE_CONTROL)
            })
        }
        Err(err) => {
            error!("Jobs request failed: {}", err);
            Err(ApiResponse::from_error(&err))
        }
    }
}
