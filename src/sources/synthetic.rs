// src/sources/synthetic.rs
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use super::JobSource;
use crate::error::FetchError;
use crate::types::{JobListing, JobQuery, ListingDefaults, RawListing};

pub const SYNTHETIC_SOURCE_NAME: &str = "Fallback";
const SYNTHETIC_DEFAULT_LOCATION: &str = "India";

const COMPANIES: [&str; 8] = [
    "Infosys",
    "Tata Consultancy Services",
    "Wipro",
    "HCLTech",
    "Tech Mahindra",
    "Zoho",
    "Freshworks",
    "Flipkart",
];

const SENIORITY: [(&str, &str); 4] = [
    ("", "0-2 Yrs"),
    ("Senior ", "3-6 Yrs"),
    ("Lead ", "6-10 Yrs"),
    ("Junior ", "0-1 Yrs"),
];

const JOB_TYPES: [&str; 3] = ["Full-time", "Contract", "Internship"];

/// Deterministic stand-in for a live board. Never fails.
pub struct SyntheticSource {
    count: usize,
    defaults: ListingDefaults,
}

impl SyntheticSource {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            defaults: ListingDefaults::new(SYNTHETIC_SOURCE_NAME, SYNTHETIC_DEFAULT_LOCATION),
        }
    }

    pub fn generate(&self, query: &JobQuery) -> Vec<JobListing> {
        let role = title_case(&query.role);
        let today = Utc::now().date_naive();

        (0..self.count)
            .map(|i| {
                let (prefix, experience) = SENIORITY[i % SENIORITY.len()];
                let company = COMPANIES[i % COMPANIES.len()];
                let posted = today - ChronoDuration::days(i as i64);

                RawListing {
                    title: Some(format!("{}{}", prefix, role)),
                    company: Some(company.to_string()),
                    location: Some(query.location.clone()),
                    description: Some(format!(
                        "{} is hiring a {}{} to join its team. Placeholder listing shown while live sources are unavailable.",
                        company,
                        prefix.to_lowercase(),
                        query.role
                    )),
                    url: None,
                    posted_date: Some(posted.format("%Y-%m-%d").to_string()),
                    salary: None,
                    job_type: Some(JOB_TYPES[i % JOB_TYPES.len()].to_string()),
                    skills: Some(vec![role.clone()]),
                    experience_level: Some(experience.to_string()),
                }
                .normalize(&self.defaults)
            })
            .collect()
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl JobSource for SyntheticSource {
    fn name(&self) -> &str {
        SYNTHETIC_SOURCE_NAME
    }

    async fn fetch(&self, query: &JobQuery) -> Result<Vec<JobListing>, FetchError> {
        Ok(self.generate(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_requested_count() {
        let source = SyntheticSource::new(12);
        let jobs = source
            .fetch(&JobQuery::new(Some("data engineer"), Some("Pune")))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 12);
        assert_eq!(jobs[0].title, "Data Engineer");
        assert_eq!(jobs[1].title, "Senior Data Engineer");
        assert!(jobs.iter().all(|job| job.source == "Fallback"));
        assert!(jobs.iter().all(|job| job.url == "#"));
        assert!(jobs.iter().all(|job| job.location == "Pune"));
    }

    #[test]
    fn test_is_deterministic_and_defaults_location() {
        let source = SyntheticSource::new(5);
        let query = JobQuery::new(Some("designer"), None);

        let first = source.generate(&query);
        let second = source.generate(&query);
        assert_eq!(first, second);
        assert_eq!(first[0].location, "India");
    }
}
