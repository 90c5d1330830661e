// src/sources/jooble.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::JobSource;
use crate::error::FetchError;
use crate::types::{JobListing, JobQuery, ListingDefaults, RawListing};

pub const JOOBLE_SOURCE_NAME: &str = "Jooble";
pub const JOOBLE_DEFAULT_URL: &str = "https://jooble.org/api";
const JOOBLE_DEFAULT_LOCATION: &str = "Remote";

/// Aggregator API proxy
pub struct JoobleSource {
    client: Client,
    api_url: String,
    api_key: String,
    defaults: ListingDefaults,
}

#[derive(Debug, Serialize)]
struct JoobleRequest<'a> {
    keywords: &'a str,
    location: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoobleResponse {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    jobs: Option<Vec<JoobleJob>>,
}

#[derive(Debug, Deserialize)]
struct JoobleJob {
    title: Option<String>,
    location: Option<String>,
    snippet: Option<String>,
    salary: Option<String>,
    #[serde(rename = "type")]
    job_type: Option<String>,
    link: Option<String>,
    company: Option<String>,
    updated: Option<String>,
}

impl From<JoobleJob> for RawListing {
    fn from(job: JoobleJob) -> Self {
        RawListing {
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.snippet,
            url: job.link,
            posted_date: job.updated,
            salary: job.salary,
            job_type: job.job_type,
            ..Default::default()
        }
    }
}

impl JoobleSource {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            defaults: ListingDefaults::new(JOOBLE_SOURCE_NAME, JOOBLE_DEFAULT_LOCATION),
        })
    }

    /// Map a raw API body into canonical listings
    pub fn parse_body(&self, body: &str) -> Result<Vec<JobListing>, FetchError> {
        let response: JoobleResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

        debug!(
            "Jooble reported {} total jobs",
            response.total_count.unwrap_or_default()
        );

        Ok(response
            .jobs
            .unwrap_or_default()
            .into_iter()
            .map(|job| RawListing::from(job).normalize(&self.defaults))
            .collect())
    }
}

#[async_trait]
impl JobSource for JoobleSource {
    fn name(&self) -> &str {
        JOOBLE_SOURCE_NAME
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, FetchError> {
        if self.api_key.is_empty() {
            return Err(FetchError::Config("Jooble API key is not set".to_string()));
        }

        let url = format!("{}/{}", self.api_url, self.api_key);
        info!(
            "Fetching Jooble jobs for role '{}' in '{}'",
            query.role, query.location
        );

        let response = self
            .client
            .post(&url)
            .json(&JoobleRequest {
                keywords: &query.role,
                location: &query.location,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let jobs = self.parse_body(&body)?;
        info!("Jooble returned {} jobs", jobs.len());
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(api_key: &str) -> JoobleSource {
        JoobleSource::new(JOOBLE_DEFAULT_URL, api_key, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_body_maps_fields() {
        let body = r#"{
            "totalCount": 2,
            "jobs": [
                {
                    "title": "Senior Rust Developer",
                    "location": "Mumbai, Maharashtra",
                    "snippet": "&nbsp;...work on <b>Rust</b> services...",
                    "salary": "₹18L - ₹25L",
                    "source": "naukri.com",
                    "type": "Full-time",
                    "link": "https://jooble.org/desc/123",
                    "company": "Acme Labs",
                    "updated": "2024-05-01T00:00:00.0000000",
                    "id": 123
                },
                { "title": "Backend Developer", "id": 456 }
            ]
        }"#;

        let jobs = source("key").parse_body(body).unwrap();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.title, "Senior Rust Developer");
        assert_eq!(first.company, "Acme Labs");
        assert_eq!(first.location, "Mumbai, Maharashtra");
        assert_eq!(first.description, "&nbsp;...work on <b>Rust</b> services...");
        assert_eq!(first.url, "https://jooble.org/desc/123");
        assert_eq!(first.posted_date, "2024-05-01T00:00:00.0000000");
        assert_eq!(first.job_type, "Full-time");
        assert_eq!(first.salary, "₹18L - ₹25L");
        assert_eq!(first.source, "Jooble");

        let second = &jobs[1];
        assert_eq!(second.company, crate::types::job_listing::PLACEHOLDER_COMPANY);
        assert_eq!(second.location, "Remote");
        assert_eq!(second.url, "#");
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_parse_body_without_jobs_is_empty() {
        let jobs = source("key").parse_body(r#"{"totalCount": 0}"#).unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_parse_body_rejects_garbage() {
        let err = source("key").parse_body("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let err = source("")
            .fetch(&JobQuery::new(Some("developer"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }
}
