use serde::{Deserialize, Serialize};

use crate::utils::collapse_whitespace;

pub const PLACEHOLDER_TITLE: &str = "Untitled position";
pub const PLACEHOLDER_COMPANY: &str = "Company not disclosed";
pub const PLACEHOLDER_URL: &str = "#";
pub const DEFAULT_ROLE: &str = "developer";

/// Canonical job listing. Every field is populated; absence is an empty
/// string, an empty list or a sentinel such as `"#"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub posted_date: String,
    pub source: String,
    pub salary: String,
    pub job_type: String,
    pub skills: Vec<String>,
    pub experience_level: String,
}

/// Per-adapter values used to fill gaps during normalization
#[derive(Debug, Clone)]
pub struct ListingDefaults {
    pub source: String,
    pub location: String,
}

impl ListingDefaults {
    pub fn new(source: &str, location: &str) -> Self {
        Self {
            source: source.to_string(),
            location: location.to_string(),
        }
    }
}

/// Upstream record mapped field-by-field, before placeholders are applied
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub posted_date: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
}

impl RawListing {
    pub fn normalize(self, defaults: &ListingDefaults) -> JobListing {
        JobListing {
            title: text_or(self.title, PLACEHOLDER_TITLE),
            company: text_or(self.company, PLACEHOLDER_COMPANY),
            location: text_or(self.location, &defaults.location),
            // Markup is kept as-is
            description: self.description.unwrap_or_default(),
            url: text_or(self.url, PLACEHOLDER_URL),
            posted_date: text_or(self.posted_date, ""),
            source: defaults.source.clone(),
            salary: text_or(self.salary, ""),
            job_type: text_or(self.job_type, ""),
            skills: self
                .skills
                .unwrap_or_default()
                .iter()
                .map(|skill| collapse_whitespace(skill))
                .filter(|skill| !skill.is_empty())
                .collect(),
            experience_level: text_or(self.experience_level, ""),
        }
    }
}

fn text_or(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// A `(role, location)` search after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub role: String,
    pub location: String,
}

impl JobQuery {
    pub fn new(role: Option<&str>, location: Option<&str>) -> Self {
        let role = role.map(collapse_whitespace).unwrap_or_default();
        let location = location.map(collapse_whitespace).unwrap_or_default();

        Self {
            role: if role.is_empty() {
                DEFAULT_ROLE.to_string()
            } else {
                role
            },
            location,
        }
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ListingDefaults {
        ListingDefaults::new("Jooble", "Remote")
    }

    fn complete() -> RawListing {
        RawListing {
            title: Some("Rust Engineer".to_string()),
            company: Some("Acme".to_string()),
            location: Some("Pune".to_string()),
            description: Some("<b>Build</b> things".to_string()),
            url: Some("https://example.com/job/1".to_string()),
            posted_date: Some("2024-05-01T00:00:00".to_string()),
            salary: Some("20 LPA".to_string()),
            job_type: Some("Full-time".to_string()),
            skills: Some(vec!["Rust".to_string(), "Tokio".to_string()]),
            experience_level: Some("3-5 Yrs".to_string()),
        }
    }

    #[test]
    fn test_complete_record_is_kept() {
        let listing = complete().normalize(&defaults());
        assert_eq!(listing.title, "Rust Engineer");
        assert_eq!(listing.company, "Acme");
        assert_eq!(listing.location, "Pune");
        assert_eq!(listing.description, "<b>Build</b> things");
        assert_eq!(listing.url, "https://example.com/job/1");
        assert_eq!(listing.source, "Jooble");
        assert_eq!(listing.skills, vec!["Rust", "Tokio"]);
    }

    fn assert_placeholder(strip: impl Fn(&mut RawListing), check: impl Fn(&JobListing) -> bool) {
        let reference = complete().normalize(&defaults());
        let mut raw = complete();
        strip(&mut raw);
        let listing = raw.normalize(&defaults());
        assert!(check(&listing), "placeholder not applied: {:?}", listing);

        // Only the stripped field differs from the complete record
        let differing = [
            listing.title != reference.title,
            listing.company != reference.company,
            listing.location != reference.location,
            listing.description != reference.description,
            listing.url != reference.url,
            listing.posted_date != reference.posted_date,
            listing.salary != reference.salary,
            listing.job_type != reference.job_type,
            listing.skills != reference.skills,
            listing.experience_level != reference.experience_level,
        ]
        .iter()
        .filter(|changed| **changed)
        .count();
        assert_eq!(differing, 1);
    }

    #[test]
    fn test_each_missing_field_gets_its_placeholder() {
        assert_placeholder(|r| r.title = None, |l| l.title == PLACEHOLDER_TITLE);
        assert_placeholder(|r| r.company = None, |l| l.company == PLACEHOLDER_COMPANY);
        assert_placeholder(|r| r.location = None, |l| l.location == "Remote");
        assert_placeholder(|r| r.description = None, |l| l.description.is_empty());
        assert_placeholder(|r| r.url = None, |l| l.url == PLACEHOLDER_URL);
        assert_placeholder(|r| r.posted_date = None, |l| l.posted_date.is_empty());
        assert_placeholder(|r| r.salary = None, |l| l.salary.is_empty());
        assert_placeholder(|r| r.job_type = None, |l| l.job_type.is_empty());
        assert_placeholder(|r| r.skills = None, |l| l.skills.is_empty());
        assert_placeholder(|r| r.experience_level = None, |l| l.experience_level.is_empty());
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let raw = RawListing {
            title: Some("   ".to_string()),
            url: Some(String::new()),
            skills: Some(vec!["  ".to_string(), "Go".to_string()]),
            ..Default::default()
        };
        let listing = raw.normalize(&ListingDefaults::new("Naukri", "India"));

        assert_eq!(listing.title, PLACEHOLDER_TITLE);
        assert_eq!(listing.url, "#");
        assert_eq!(listing.location, "India");
        assert_eq!(listing.source, "Naukri");
        assert_eq!(listing.skills, vec!["Go"]);
    }

    #[test]
    fn test_serializes_camel_case_without_nulls() {
        let listing = RawListing::default().normalize(&defaults());
        let value = serde_json::to_value(&listing).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("postedDate"));
        assert!(object.contains_key("jobType"));
        assert!(object.contains_key("experienceLevel"));
        assert!(object.values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_query_defaults() {
        let query = JobQuery::new(None, None);
        assert_eq!(query.role, "developer");
        assert_eq!(query.location, "");
        assert!(!query.has_location());

        let query = JobQuery::new(Some("  "), Some(" New   Delhi "));
        assert_eq!(query.role, "developer");
        assert_eq!(query.location, "New Delhi");
    }
}
