// src/sources/mod.rs
//! Upstream job sources. Every adapter returns canonical `JobListing`s so the
//! cache never needs to know where a batch came from.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{JobListing, JobQuery};

pub mod jooble;
pub mod scrape;
pub mod synthetic;

pub use jooble::JoobleSource;
pub use scrape::{ScrapeSelectors, ScrapeSource};
pub use synthetic::SyntheticSource;

#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    /// One upstream call, no retry. An empty list is a valid answer.
    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::types::{ListingDefaults, RawListing};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted source: pops one outcome per call, repeating the last one
    pub struct ScriptedSource {
        outcomes: Mutex<VecDeque<Result<Vec<JobListing>, FetchError>>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedSource {
        pub fn new(outcomes: Vec<Result<Vec<JobListing>, FetchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobSource for ScriptedSource {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn fetch(&self, _query: &JobQuery) -> Result<Vec<JobListing>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.len() > 1 {
                outcomes.pop_front().unwrap()
            } else {
                outcomes
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Ok(Vec::new()))
            }
        }
    }

    pub fn listings(prefix: &str, count: usize) -> Vec<JobListing> {
        let defaults = ListingDefaults::new("Scripted", "Remote");
        (1..=count)
            .map(|i| {
                RawListing {
                    title: Some(format!("{} {}", prefix, i)),
                    company: Some(format!("Company {}", i)),
                    ..Default::default()
                }
                .normalize(&defaults)
            })
            .collect()
    }

    pub fn upstream_down() -> FetchError {
        FetchError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }
}
