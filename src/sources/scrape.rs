// src/sources/scrape.rs
use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use super::JobSource;
use crate::error::FetchError;
use crate::types::{JobListing, JobQuery, ListingDefaults, RawListing};
use crate::utils::{collapse_whitespace, slugify};

pub const NAUKRI_SOURCE_NAME: &str = "Naukri";
pub const NAUKRI_SEARCH_URL: &str = "https://www.naukri.com/{role}-jobs-in-{location}";
const SCRAPE_DEFAULT_LOCATION: &str = "India";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// CSS selectors for one job board. Field selectors are evaluated inside
/// each card.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSelectors {
    pub card: String,
    pub title: String,
    pub link: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: String,
    pub experience: String,
    pub posted: String,
    pub skills: String,
}

impl Default for ScrapeSelectors {
    fn default() -> Self {
        Self {
            card: ".srp-jobtuple-wrapper, article.jobTuple".to_string(),
            title: "a.title".to_string(),
            link: "a.title".to_string(),
            company: "a.comp-name, .companyInfo a".to_string(),
            location: ".locWdth, .location span".to_string(),
            description: ".job-desc, .job-description".to_string(),
            salary: ".sal-wrap span, .salary span".to_string(),
            experience: ".expwdth, .experience span".to_string(),
            posted: ".job-post-day, .jobTupleFooter .type span".to_string(),
            skills: "ul.tags-gt li, ul.tags li".to_string(),
        }
    }
}

struct CompiledSelectors {
    card: Selector,
    title: Selector,
    link: Selector,
    company: Selector,
    location: Selector,
    description: Selector,
    salary: Selector,
    experience: Selector,
    posted: Selector,
    skills: Selector,
}

impl CompiledSelectors {
    fn compile(selectors: &ScrapeSelectors) -> Result<Self, FetchError> {
        Ok(Self {
            card: parse_selector(&selectors.card)?,
            title: parse_selector(&selectors.title)?,
            link: parse_selector(&selectors.link)?,
            company: parse_selector(&selectors.company)?,
            location: parse_selector(&selectors.location)?,
            description: parse_selector(&selectors.description)?,
            salary: parse_selector(&selectors.salary)?,
            experience: parse_selector(&selectors.experience)?,
            posted: parse_selector(&selectors.posted)?,
            skills: parse_selector(&selectors.skills)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector)
        .map_err(|e| FetchError::Config(format!("Invalid selector '{}': {}", selector, e)))
}

/// HTML job board scraper
pub struct ScrapeSource {
    client: Client,
    name: String,
    search_url: String,
    selectors: CompiledSelectors,
    defaults: ListingDefaults,
}

impl ScrapeSource {
    pub fn new(
        name: &str,
        search_url: &str,
        selectors: &ScrapeSelectors,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            name: name.to_string(),
            search_url: search_url.to_string(),
            selectors: CompiledSelectors::compile(selectors)?,
            defaults: ListingDefaults::new(name, SCRAPE_DEFAULT_LOCATION),
        })
    }

    pub fn naukri(timeout: Duration) -> Result<Self, FetchError> {
        Self::new(
            NAUKRI_SOURCE_NAME,
            NAUKRI_SEARCH_URL,
            &ScrapeSelectors::default(),
            timeout,
        )
    }

    /// Fill the `{role}`/`{location}` slots. Without a location the
    /// `-in-{location}` segment is dropped.
    pub fn search_url(&self, query: &JobQuery) -> String {
        let role = slugify(&query.role);
        let location = slugify(&query.location);

        if query.has_location() && !location.is_empty() {
            self.search_url
                .replace("{role}", &role)
                .replace("{location}", &location)
        } else {
            self.search_url
                .replace("-in-{location}", "")
                .replace("{location}", "")
                .replace("{role}", &role)
        }
    }

    /// Extract listings from a search results page
    pub fn parse_page(&self, html: &str, page_url: &str) -> Vec<JobListing> {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        document
            .select(&self.selectors.card)
            .map(|card| self.parse_card(card, base.as_ref()))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>, base: Option<&Url>) -> JobListing {
        let selectors = &self.selectors;

        let url = card
            .select(&selectors.link)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(|href| resolve_link(href, base));

        let skills = card
            .select(&selectors.skills)
            .map(|skill| element_text(skill))
            .collect::<Vec<_>>();

        RawListing {
            title: first_text(card, &selectors.title),
            company: first_text(card, &selectors.company),
            location: first_text(card, &selectors.location),
            description: first_html(card, &selectors.description),
            url,
            posted_date: first_text(card, &selectors.posted),
            salary: first_text(card, &selectors.salary),
            job_type: None,
            skills: Some(skills),
            experience_level: first_text(card, &selectors.experience),
        }
        .normalize(&self.defaults)
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Descriptions keep their markup
fn first_html(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .map(|element| element.inner_html().trim().to_string())
        .find(|html| !html.is_empty())
}

fn resolve_link(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href == "#" {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.and_then(|base| base.join(href).ok()).map(String::from),
    }
}

#[async_trait]
impl JobSource for ScrapeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, FetchError> {
        let url = self.search_url(query);
        info!("Scraping {} listings: {}", self.name, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: format!("HTTP error from {}: {}", self.name, status),
            });
        }

        let html = response.text().await?;
        let jobs = self.parse_page(&html, &url);

        if jobs.is_empty() {
            warn!("No job cards matched on {}", url);
        } else {
            info!("Scraped {} jobs from {}", jobs.len(), self.name);
        }

        Ok(jobs)
    }
}
