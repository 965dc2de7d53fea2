// src/scraping/african.rs
//! Regional job boards (ReKrute, Emploitic, Tanitjobs, ...) reached through the scraping proxy

use super::{normalize_record, JobSource, ScrapeFilters, ScrapingProxy};
use crate::classifier::JobClassifier;
use crate::types::JobListing;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub struct AfricanJobsScraper {
    proxy: ScrapingProxy,
    country: String,
    site: String,
    classifier: Arc<dyn JobClassifier>,
    name: String,
}

impl AfricanJobsScraper {
    pub fn new(
        proxy: ScrapingProxy,
        country: impl Into<String>,
        site: impl Into<String>,
        classifier: Arc<dyn JobClassifier>,
    ) -> Self {
        let country = country.into();
        let site = site.into();
        Self {
            name: format!("{}/{}", site, country),
            proxy,
            country,
            site,
            classifier,
        }
    }
}

#[async_trait]
impl JobSource for AfricanJobsScraper {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self, filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
        let path = format!("/api/scraping/african/{}/{}", self.country, self.site);
        let records = self.proxy.fetch(&path, filters, &self.name).await?;

        Ok(records
            .into_iter()
            .map(|raw| normalize_record(raw, &self.site, self.classifier.as_ref()))
            .collect())
    }
}
