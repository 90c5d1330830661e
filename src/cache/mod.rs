// src/cache/mod.rs
//! In-memory aggregation cache in front of a live job source.

pub mod policy;

pub use policy::{cache_key, CacheSettings, LimitPolicy};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{FetchError, JobsError};
use crate::sources::JobSource;
use crate::types::{JobListing, JobQuery};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub jobs: Vec<JobListing>,
    pub created_at: Instant,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: std::time::Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Result of a `get`, with flags describing how it was served
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBatch {
    pub jobs: Vec<JobListing>,
    pub total: usize,
    pub cached: bool,
    pub stale: bool,
    pub fallback: bool,
    pub warning: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl JobBatch {
    fn new(mut jobs: Vec<JobListing>, limit: usize, fetched_at: DateTime<Utc>) -> Self {
        jobs.truncate(limit);
        Self {
            total: jobs.len(),
            jobs,
            cached: false,
            stale: false,
            fallback: false,
            warning: None,
            fetched_at,
        }
    }

    fn from_entry(entry: &CacheEntry, limit: usize) -> Self {
        let jobs = entry.jobs.iter().take(limit).cloned().collect();
        Self {
            cached: true,
            ..Self::new(jobs, limit, entry.fetched_at)
        }
    }
}

pub struct JobCache {
    source: Arc<dyn JobSource>,
    last_resort: Option<Arc<dyn JobSource>>,
    settings: CacheSettings,
    entries: RwLock<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, Gate>>,
}

impl JobCache {
    pub fn new(source: Arc<dyn JobSource>, settings: CacheSettings) -> Self {
        Self {
            source,
            last_resort: None,
            settings,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Source consulted only when a cold key fails; its output is not cached
    pub fn with_last_resort(mut self, source: Arc<dyn JobSource>) -> Self {
        self.last_resort = Some(source);
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn get(
        &self,
        role: &str,
        location: &str,
        limit: Option<i64>,
    ) -> Result<JobBatch, JobsError> {
        let query = JobQuery::new(Some(role), Some(location));
        let key = cache_key(&query);
        let limit = self.settings.limits.resolve(limit);

        if let Some(batch) = self.fresh_batch(&key, limit).await {
            debug!("Cache hit for {}", key);
            return Ok(batch);
        }

        let flight = self.join_flight(&key);
        let mut failure = flight.gate.lock().await;

        // Another request may have refreshed the key while we waited
        if let Some(batch) = self.fresh_batch(&key, limit).await {
            debug!("Cache filled by concurrent fetch for {}", key);
            return Ok(batch);
        }

        // The fetch we queued behind failed; reuse its outcome
        if let Some(err) = failure.clone() {
            debug!("Sharing failed fetch outcome for {}", key);
            return self.degrade(&key, &query, limit, err).await;
        }

        info!("Cache miss for {}, fetching from {}", key, self.source.name());
        let fetched = self.source.fetch(&query).await;
        match fetched {
            Ok(jobs) => Ok(self.store(&key, jobs, limit).await),
            Err(err) => {
                *failure = Some(err.clone());
                self.degrade(&key, &query, limit, err).await
            }
        }
    }

    /// Passthrough: straight to the live source, nothing read or written
    pub async fn fetch_uncached(
        &self,
        role: &str,
        location: &str,
        limit: Option<i64>,
    ) -> Result<JobBatch, JobsError> {
        let query = JobQuery::new(Some(role), Some(location));
        let limit = self.settings.limits.resolve(limit);

        let jobs = self.source.fetch(&query).await?;
        Ok(JobBatch::new(jobs, limit, Utc::now()))
    }

    async fn fresh_batch(&self, key: &str, limit: usize) -> Option<JobBatch> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.settings.ttl))
            .map(|entry| JobBatch::from_entry(entry, limit))
    }

    async fn store(&self, key: &str, jobs: Vec<JobListing>, limit: usize) -> JobBatch {
        let entry = CacheEntry {
            key: key.to_string(),
            jobs,
            created_at: Instant::now(),
            fetched_at: Utc::now(),
        };
        let batch = JobBatch::new(entry.jobs.clone(), limit, entry.fetched_at);

        self.entries.write().await.insert(key.to_string(), entry);
        info!("Cached {} jobs for {}", batch.total, key);
        batch
    }

    async fn degrade(
        &self,
        key: &str,
        query: &JobQuery,
        limit: usize,
        err: FetchError,
    ) -> Result<JobBatch, JobsError> {
        if let Some(entry) = self.entries.read().await.get(key) {
            warn!("Live fetch failed for {}, serving stale cache: {}", key, err);
            return Ok(JobBatch {
                stale: true,
                warning: Some(err.to_string()),
                ..JobBatch::from_entry(entry, limit)
            });
        }

        if let Some(last_resort) = &self.last_resort {
            warn!(
                "Live fetch failed for cold key {}, using {}: {}",
                key,
                last_resort.name(),
                err
            );
            match last_resort.fetch(query).await {
                Ok(jobs) => {
                    return Ok(JobBatch {
                        fallback: true,
                        warning: Some(err.to_string()),
                        ..JobBatch::new(jobs, limit, Utc::now())
                    });
                }
                Err(last_resort_err) => warn!(
                    "Last resort {} also failed for {}: {}",
                    last_resort.name(),
                    key,
                    last_resort_err
                ),
            }
        }

        warn!("Live fetch failed for cold key {}: {}", key, err);
        Err(JobsError::NoFallback {
            key: key.to_string(),
            source: err,
        })
    }

    fn join_flight<'a>(&'a self, key: &'a str) -> Flight<'a> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let gate = in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(None)))
            .clone();

        Flight {
            cache: self,
            key,
            gate,
        }
    }
}

/// Holds the last failure of the fetch running for a key, if any
type Gate = Arc<AsyncMutex<Option<FetchError>>>;

/// Membership in a key's in-flight group. Dropping the last member removes
/// the gate, including when the request future is cancelled.
struct Flight<'a> {
    cache: &'a JobCache,
    key: &'a str,
    gate: Gate,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .cache
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Map plus our handle: nobody else is waiting
        let ours = in_flight
            .get(self.key)
            .is_some_and(|gate| Arc::ptr_eq(gate, &self.gate));
        if ours && Arc::strong_count(&self.gate) == 2 {
            in_flight.remove(self.key);
        }
    }
}
