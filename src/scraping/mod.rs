// src/scraping/mod.rs
//! Job sources, the per-country registry and the orchestrator that fans out to them

pub mod african;
pub mod indeed;
pub mod job_page;
pub mod linkedin;
pub mod official_api;
pub mod orchestrator;
pub mod proxy;
pub mod registry;

pub use african::AfricanJobsScraper;
pub use indeed::IndeedScraper;
pub use job_page::JobPageScraper;
pub use linkedin::LinkedInScraper;
pub use official_api::OfficialApiSource;
pub use orchestrator::{deduplicate_jobs, filter_jobs, JobScrapingService};
pub use proxy::ScrapingProxy;
pub use registry::{ApiSourceConfig, CountrySources, ScraperKind, ScraperTarget, SourceRegistry};

use crate::classifier::JobClassifier;
use crate::types::response::RawJobRecord;
use crate::types::{ContractType, ExperienceLevel, JobListing, JobSearchFilters, RemoteWork};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Per-request parameters handed to every source. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeFilters {
    pub query: Option<String>,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub experience: Option<ExperienceLevel>,
    pub contract: Option<ContractType>,
    pub remote: Option<RemoteWork>,
    pub max_days_old: Option<u32>,
}

impl ScrapeFilters {
    pub fn from_search(filters: &JobSearchFilters, limit: u32) -> Self {
        let non_empty = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        // Sources only take a single value; pass one through when the user picked exactly one
        let single = |len: usize| len == 1;

        Self {
            query: non_empty(&filters.query),
            location: non_empty(&filters.location),
            page: Some(1),
            limit: Some(limit),
            experience: single(filters.experience_level.len())
                .then(|| filters.experience_level[0]),
            contract: single(filters.contract_type.len()).then(|| filters.contract_type[0]),
            remote: single(filters.remote.len()).then(|| filters.remote[0]),
            max_days_old: filters.posted_since.max_days_old(),
        }
    }
}

#[async_trait]
pub trait JobSource: Send + Sync {
    /// Label used in logs and as the `source` tag of produced listings
    fn name(&self) -> &str;

    async fn scrape(&self, filters: &ScrapeFilters) -> Result<Vec<JobListing>>;
}

pub(crate) fn generate_job_id(source: &str) -> String {
    format!("{}-{}", source, uuid::Uuid::new_v4())
}

pub(crate) fn parse_posted_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.map(str::trim)
        .and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|d| d.and_utc())
                })
        })
        .unwrap_or_else(Utc::now)
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Turns a validated raw record into a listing, defaulting everything the source left out.
/// Attribute fields are classified from the explicit upstream value when present,
/// from the title (and location for remote work) otherwise.
pub fn normalize_record(
    raw: RawJobRecord,
    source: &str,
    classifier: &dyn JobClassifier,
) -> JobListing {
    let title = clean(raw.title);
    let location = clean(raw.location);

    let contract_type = match raw.contract_type.as_deref() {
        Some(text) if !text.trim().is_empty() => classifier.classify_contract_type(text),
        _ => classifier.classify_contract_type(&title),
    };
    let experience_level = match raw.experience_level.as_deref() {
        Some(text) if !text.trim().is_empty() => classifier.classify_experience_level(text),
        _ => classifier.classify_experience_level(&title),
    };
    let remote = match raw.remote.as_deref() {
        Some(text) if !text.trim().is_empty() => classifier.classify_remote_work(text),
        _ => classifier.classify_remote_work(&format!("{} {}", title, location)),
    };

    JobListing {
        id: raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generate_job_id(source)),
        title,
        company: clean(raw.company),
        location,
        description: clean(raw.description),
        salary: raw
            .salary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        contract_type,
        experience_level,
        remote,
        url: clean(raw.url),
        source: source.to_string(),
        posted_date: parse_posted_date(raw.posted_date.as_deref()),
        match_score: None,
        is_favorite: false,
    }
}
