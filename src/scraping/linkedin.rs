// src/scraping/linkedin.rs
use super::{normalize_record, JobSource, ScrapeFilters, ScrapingProxy};
use crate::classifier::JobClassifier;
use crate::types::JobListing;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub struct LinkedInScraper {
    proxy: ScrapingProxy,
    country: String,
    classifier: Arc<dyn JobClassifier>,
    name: String,
}

impl LinkedInScraper {
    pub fn new(
        proxy: ScrapingProxy,
        country: impl Into<String>,
        classifier: Arc<dyn JobClassifier>,
    ) -> Self {
        let country = country.into();
        Self {
            name: format!("linkedin/{}", country),
            proxy,
            country,
            classifier,
        }
    }
}

#[async_trait]
impl JobSource for LinkedInScraper {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self, filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
        let path = format!("/api/scraping/linkedin/{}", self.country);
        let records = self.proxy.fetch(&path, filters, &self.name).await?;

        Ok(records
            .into_iter()
            .map(|raw| normalize_record(raw, "linkedin", self.classifier.as_ref()))
            .collect())
    }
}
