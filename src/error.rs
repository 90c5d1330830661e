// src/error.rs
use thiserror::Error;

/// Failure of a single upstream call
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not match the expected schema
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    /// Source is not usable as configured
    #[error("Source misconfigured: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum JobsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Live fetch failed in passthrough mode
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Live fetch failed and nothing was ever cached for the key
    #[error("No cached jobs for '{key}' and the live fetch failed: {source}")]
    NoFallback {
        key: String,
        #[source]
        source: FetchError,
    },
}

impl JobsError {
    pub fn error_code(&self) -> &'static str {
        match self {
            JobsError::InvalidInput(_) => "INVALID_INPUT",
            JobsError::Upstream(_) => "UPSTREAM_ERROR",
            JobsError::NoFallback { .. } => "NO_FALLBACK",
        }
    }

    /// Upstream detail surfaced to API callers
    pub fn upstream_message(&self) -> String {
        match self {
            JobsError::InvalidInput(message) => message.clone(),
            JobsError::Upstream(source) | JobsError::NoFallback { source, .. } => {
                source.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fallback_carries_upstream_message() {
        let err = JobsError::NoFallback {
            key: "designer::pune".to_string(),
            source: FetchError::Status {
                status: 503,
                message: "maintenance".to_string(),
            },
        };

        assert_eq!(err.error_code(), "NO_FALLBACK");
        assert_eq!(
            err.upstream_message(),
            "Upstream returned status 503: maintenance"
        );
        assert!(err.to_string().contains("designer::pune"));
    }

    #[test]
    fn test_upstream_is_transparent() {
        let err = JobsError::from(FetchError::Network("timed out".to_string()));
        assert_eq!(err.to_string(), "Network error: timed out");
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }
}
