// src/web/types.rs
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::{Json, Value};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::cache::JobBatch;
use crate::error::JobsError;
use crate::types::JobListing;

pub const PASSTHROUGH_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";

pub struct ServerConfig {
    pub cache_enabled: bool,
}

/// POST body; `query` is accepted as an alias of `role`
#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde")]
pub struct JobsRequest {
    pub query: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub limit: Option<Value>,
}

impl JobsRequest {
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref().or(self.query.as_deref())
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobsResponse {
    pub success: bool,
    pub jobs: Vec<JobListing>,
    pub total: usize,
    pub cached: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub timestamp: String,
}

impl From<JobBatch> for JobsResponse {
    fn from(batch: JobBatch) -> Self {
        Self {
            success: true,
            total: batch.total,
            jobs: batch.jobs,
            cached: batch.cached,
            stale: batch.stale,
            fallback: batch.fallback,
            warning: batch.warning,
            timestamp: batch.fetched_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(message: &str, error: String, error_code: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error,
            error_code: error_code.to_string(),
        }
    }
}

impl From<&JobsError> for ErrorResponse {
    fn from(err: &JobsError) -> Self {
        let message = match err {
            JobsError::InvalidInput(_) => "Invalid request",
            JobsError::Upstream(_) | JobsError::NoFallback { .. } => "Failed to fetch jobs",
        };
        ErrorResponse::new(message, err.upstream_message(), err.error_code())
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub source: String,
    pub cache_enabled: bool,
    pub timestamp: String,
}

/// JSON body with an explicit status and optional extra headers
pub struct ApiResponse<T> {
    pub status: Status,
    pub body: T,
    pub headers: Vec<(&'static str, &'static str)>,
}

impl<T> ApiResponse<T> {
    pub fn new(status: Status, body: T) -> Self {
        Self {
            status,
            body,
            headers: Vec::new(),
        }
    }

    pub fn ok(body: T) -> Self {
        Self::new(Status::Ok, body)
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

impl ApiResponse<ErrorResponse> {
    pub fn from_error(err: &JobsError) -> Self {
        let status = match err {
            JobsError::InvalidInput(_) => Status::BadRequest,
            JobsError::Upstream(_) => Status::BadGateway,
            JobsError::NoFallback { .. } => Status::InternalServerError,
        };
        Self::new(status, ErrorResponse::from(err))
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for ApiResponse<T> {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Response::build_from(Json(self.body).respond_to(request)?);
        response.status(self.status);

        for (name, value) in self.headers {
            response.raw_header(name, value);
        }

        response.ok()
    }
}
