// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, patch, post, put, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::cache::JobCache;
use crate::environment::EnvironmentConfig;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

#[get("/jobs?<role>&<query>&<location>&<limit>")]
pub async fn get_jobs(
    role: Option<String>,
    query: Option<String>,
    location: Option<String>,
    limit: Option<String>,
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> JobsResult {
    handlers::get_jobs_handler(role.or(query), location, limit, cache, config).await
}

#[post("/jobs", data = "<request>")]
pub async fn post_jobs(
    request: Option<Json<JobsRequest>>,
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> JobsResult {
    handlers::post_jobs_handler(request, cache, config).await
}

#[options("/jobs")]
pub async fn jobs_options() -> Status {
    Status::NoContent
}

#[put("/jobs")]
pub async fn put_jobs() -> ApiResponse<ErrorResponse> {
    handlers::method_not_allowed_handler("PUT").await
}

#[patch("/jobs")]
pub async fn patch_jobs() -> ApiResponse<ErrorResponse> {
    handlers::method_not_allowed_handler("PATCH").await
}

#[delete("/jobs")]
pub async fn delete_jobs() -> ApiResponse<ErrorResponse> {
    handlers::method_not_allowed_handler("DELETE").await
}

#[get("/health")]
pub async fn health(
    cache: &State<JobCache>,
    config: &State<ServerConfig>,
) -> Json<HealthResponse> {
    handlers::health_handler(cache, config).await
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Invalid request",
        "Check your request format".to_string(),
        "BAD_REQUEST",
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Not found",
        format!("No route for {} {}", request.method(), request.uri()),
        "NOT_FOUND",
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error",
        "Try again in a few moments".to_string(),
        "INTERNAL_ERROR",
    ))
}

/// Attach state, fairings, routes and catchers to a Rocket instance
pub fn mount(rocket: Rocket<Build>, cache: JobCache, server_config: ServerConfig) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(cache)
        .manage(server_config)
        .register("/", catchers![bad_request, not_found, internal_error])
        .mount(
            "/",
            routes![
                get_jobs,
                post_jobs,
                jobs_options,
                put_jobs,
                patch_jobs,
                delete_jobs,
                health,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig) -> Result<()> {
    let cache = config.build_cache()?;
    let server_config = ServerConfig {
        cache_enabled: config.cache.enabled,
    };

    info!("Starting jobfeed API server");
    info!("Server: http://0.0.0.0:{}", config.port);
    info!(
        "Caching: {}",
        if config.cache.enabled {
            "in-memory TTL cache"
        } else {
            "passthrough"
        }
    );

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    let _rocket = mount(rocket::custom(figment), cache, server_config)
        .launch()
        .await?;

    Ok(())
}
