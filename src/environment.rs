// src/environment.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::{CacheSettings, JobCache, LimitPolicy};
use crate::sources::jooble::JOOBLE_DEFAULT_URL;
use crate::sources::scrape::{NAUKRI_SEARCH_URL, NAUKRI_SOURCE_NAME};
use crate::sources::{JobSource, JoobleSource, ScrapeSelectors, ScrapeSource, SyntheticSource};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Jooble,
    Scrape,
    Synthetic,
}

impl SourceKind {
    /// API responses change slowly; scraped boards are refreshed more often
    pub fn default_ttl_seconds(&self) -> u64 {
        match self {
            SourceKind::Jooble => 3600,
            SourceKind::Scrape | SourceKind::Synthetic => 900,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "jooble" => Some(SourceKind::Jooble),
            "scrape" | "naukri" => Some(SourceKind::Scrape),
            "synthetic" | "fallback" => Some(SourceKind::Synthetic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JoobleConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl Default for JoobleConfig {
    fn default() -> Self {
        Self {
            api_url: JOOBLE_DEFAULT_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub name: String,
    pub search_url: String,
    pub timeout_seconds: u64,
    pub selectors: ScrapeSelectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            name: NAUKRI_SOURCE_NAME.to_string(),
            search_url: NAUKRI_SEARCH_URL.to_string(),
            timeout_seconds: 15,
            selectors: ScrapeSelectors::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_seconds: Option<u64>,
    pub min_limit: usize,
    pub max_limit: usize,
    pub default_limit: usize,
    /// Serve synthetic listings when a never-cached key fails
    pub synthetic_fallback: bool,
    pub synthetic_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let limits = LimitPolicy::default();
        Self {
            enabled: true,
            ttl_seconds: None,
            min_limit: limits.min,
            max_limit: limits.max,
            default_limit: limits.default,
            synthetic_fallback: false,
            synthetic_count: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub port: u16,
    pub source: SourceKind,
    pub jooble: JoobleConfig,
    pub scrape: ScrapeConfig,
    pub cache: CacheConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            source: SourceKind::Jooble,
            jooble: JoobleConfig::default(),
            scrape: ScrapeConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load(path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = Self::load_from_file(path, &environment)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("JOBFEED_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            warn!(
                "{} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("JOOBLE_API_KEY") {
            self.jooble.api_key = key;
        }

        if let Some(source) = lookup("JOBS_SOURCE") {
            self.source = SourceKind::parse(&source)
                .with_context(|| format!("JOBS_SOURCE has unknown value '{}'", source))?;
        }

        if let Some(port) = lookup("ROCKET_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        if let Some(ttl) = lookup("JOBS_CACHE_TTL_SECONDS") {
            let ttl = ttl
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("JOBS_CACHE_TTL_SECONDS must be a number of seconds"))?;
            self.cache.ttl_seconds = Some(ttl);
        }

        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(
            self.cache
                .ttl_seconds
                .unwrap_or_else(|| self.source.default_ttl_seconds()),
        )
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(self.ttl()).with_limits(LimitPolicy::new(
            self.cache.min_limit,
            self.cache.max_limit,
            self.cache.default_limit,
        ))
    }

    /// Build the configured live source
    pub fn build_source(&self) -> Result<Arc<dyn JobSource>> {
        let source: Arc<dyn JobSource> = match self.source {
            SourceKind::Jooble => {
                if self.jooble.api_key.is_empty() {
                    warn!("JOOBLE_API_KEY is not set; every live fetch will fail");
                }
                Arc::new(
                    JoobleSource::new(
                        &self.jooble.api_url,
                        &self.jooble.api_key,
                        Duration::from_secs(self.jooble.timeout_seconds),
                    )
                    .context("Failed to create Jooble source")?,
                )
            }
            SourceKind::Scrape => Arc::new(
                ScrapeSource::new(
                    &self.scrape.name,
                    &self.scrape.search_url,
                    &self.scrape.selectors,
                    Duration::from_secs(self.scrape.timeout_seconds),
                )
                .context("Failed to create scrape source")?,
            ),
            SourceKind::Synthetic => Arc::new(SyntheticSource::new(self.cache.synthetic_count)),
        };

        Ok(source)
    }

    /// Build the cache the server and CLI share
    pub fn build_cache(&self) -> Result<JobCache> {
        let source = self.build_source()?;
        info!(
            "Using source {} with TTL {}s",
            source.name(),
            self.ttl().as_secs()
        );

        let mut cache = JobCache::new(source, self.cache_settings());
        if self.cache.synthetic_fallback {
            cache = cache.with_last_resort(Arc::new(SyntheticSource::new(
                self.cache.synthetic_count,
            )));
        }

        Ok(cache)
    }
}
