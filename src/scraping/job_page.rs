// src/scraping/job_page.rs
//! Import of a single job posting from its public URL

use super::{generate_job_id, normalize_record};
use crate::classifier::JobClassifier;
use crate::types::response::RawJobRecord;
use crate::types::JobListing;
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{info, warn};

pub const IMPORT_SOURCE: &str = "import";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const LINKEDIN_TITLE: &[&str] = &[
    "h1.top-card-layout__title",
    ".job-details-jobs-unified-top-card__job-title",
    "h1[data-test-id='job-title']",
    ".jobs-unified-top-card__job-title",
];
const LINKEDIN_COMPANY: &[&str] = &[
    ".job-details-jobs-unified-top-card__company-name",
    ".top-card-layout__card .top-card-layout__second-subline",
    "a[data-test-id='job-poster-name']",
    ".jobs-unified-top-card__company-name",
];
const LINKEDIN_DESCRIPTION: &[&str] = &[
    ".jobs-box__html-content",
    ".jobs-description__container",
    ".jobs-description-content__text",
    "[data-test-id='job-description']",
    ".description__text",
];
const LINKEDIN_LOCATION: &[&str] = &[
    ".job-details-jobs-unified-top-card__bullet",
    ".top-card-layout__card .top-card-layout__first-subline",
    "[data-test-id='job-location']",
    ".jobs-unified-top-card__bullet",
];

const GENERIC_TITLE: &[&str] = &["h1", "[class*='job-title']", "[class*='title']"];
const GENERIC_COMPANY: &[&str] = &[
    "[class*='company']",
    "[class*='employer']",
    "[class*='organization']",
];
const GENERIC_LOCATION: &[&str] = &["[class*='location']", "[class*='address']"];
const GENERIC_DESCRIPTION: &[&str] = &[
    "[class*='description']",
    "[class*='content']",
    "[class*='details']",
    "main",
    "article",
];

pub struct JobPageScraper {
    client: Client,
    classifier: Arc<dyn JobClassifier>,
}

impl JobPageScraper {
    pub fn new(timeout_seconds: u64, classifier: Arc<dyn JobClassifier>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, classifier })
    }

    pub async fn import_job(&self, url: &str) -> Result<JobListing> {
        info!("Fetching job post: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job post")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch job post: HTTP {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let mut listing = self.parse_html(&html).context("Failed to extract job content from page")?;
        listing.url = url.to_string();

        info!(
            "Successfully extracted job: {} at {}",
            listing.title, listing.company
        );
        Ok(listing)
    }

    /// LinkedIn markup first, generic selectors as a fallback
    pub fn parse_html(&self, html: &str) -> Option<JobListing> {
        let document = Html::parse_document(html);
        let raw = parse_linkedin_job(&document).or_else(|| parse_generic_job(&document))?;

        let mut listing = normalize_record(raw, IMPORT_SOURCE, self.classifier.as_ref());
        listing.id = generate_job_id(IMPORT_SOURCE);
        Some(listing)
    }
}

fn parse_linkedin_job(document: &Html) -> Option<RawJobRecord> {
    let title = find_text_by_selectors(document, LINKEDIN_TITLE)?;
    let company = find_text_by_selectors(document, LINKEDIN_COMPANY)?;
    let description = find_text_by_selectors(document, LINKEDIN_DESCRIPTION)?;
    let location = find_text_by_selectors(document, LINKEDIN_LOCATION);

    Some(RawJobRecord {
        title: Some(title),
        company: Some(company),
        description: Some(description),
        location,
        ..Default::default()
    })
}

fn parse_generic_job(document: &Html) -> Option<RawJobRecord> {
    warn!("Falling back to generic job parsing");

    let title = find_text_by_selectors(document, GENERIC_TITLE)?;
    let description = find_text_by_selectors(document, GENERIC_DESCRIPTION)?;

    Some(RawJobRecord {
        title: Some(title),
        company: find_text_by_selectors(document, GENERIC_COMPANY),
        location: find_text_by_selectors(document, GENERIC_LOCATION),
        description: Some(description),
        ..Default::default()
    })
}

fn find_text_by_selectors(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if text.len() > 1 {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::types::{ExperienceLevel, RemoteWork};

    fn scraper() -> JobPageScraper {
        JobPageScraper::new(5, Arc::new(KeywordClassifier)).unwrap()
    }

    #[test]
    fn test_parse_linkedin_markup() {
        let html = r#"
            <html><body>
              <h1 class="top-card-layout__title">Senior Data Engineer</h1>
              <div class="top-card-layout__card">
                <span class="top-card-layout__first-subline">Casablanca (Hybrid)</span>
                <span class="top-card-layout__second-subline">Atlas Analytics</span>
              </div>
              <div class="description__text">
                We use   Python and
                SQL every day.
              </div>
            </body></html>"#;

        let job = scraper().parse_html(html).unwrap();
        assert_eq!(job.title, "Senior Data Engineer");
        assert_eq!(job.company, "Atlas Analytics");
        assert_eq!(job.location, "Casablanca (Hybrid)");
        assert_eq!(job.description, "We use Python and SQL every day.");
        assert_eq!(job.experience_level, ExperienceLevel::Senior);
        assert_eq!(job.remote, RemoteWork::Hybrid);
        assert_eq!(job.source, IMPORT_SOURCE);
    }

    #[test]
    fn test_parse_generic_markup() {
        let html = r#"
            <html><body>
              <h1>Product Designer</h1>
              <span class="company-name">Globex</span>
              <article>Design systems and user research.</article>
            </body></html>"#;

        let job = scraper().parse_html(html).unwrap();
        assert_eq!(job.title, "Product Designer");
        assert_eq!(job.company, "Globex");
        assert_eq!(job.description, "Design systems and user research.");
        assert_eq!(job.location, "");
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(scraper().parse_html("<html><body></body></html>").is_none());
    }
}
