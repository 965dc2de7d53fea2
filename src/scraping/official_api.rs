// src/scraping/official_api.rs
//! Adzuna-style official job search APIs

use super::{generate_job_id, parse_posted_date, JobSource, ScrapeFilters};
use crate::classifier::JobClassifier;
use crate::types::response::{OfficialApiJob, OfficialApiResponse};
use crate::types::{ContractType, JobListing};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_RESULTS_PER_PAGE: u32 = 20;

pub struct OfficialApiSource {
    client: Client,
    name: String,
    /// May contain `{country}` and `{page}` placeholders
    endpoint: String,
    country_code: String,
    currency: String,
    app_id: String,
    app_key: String,
    classifier: Arc<dyn JobClassifier>,
}

impl OfficialApiSource {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Client,
        name: impl Into<String>,
        endpoint: impl Into<String>,
        country_code: impl Into<String>,
        currency: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        classifier: Arc<dyn JobClassifier>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            endpoint: endpoint.into(),
            country_code: country_code.into(),
            currency: currency.into(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            classifier,
        }
    }

    fn endpoint_url(&self, page: u32) -> String {
        self.endpoint
            .replace("{country}", &self.country_code)
            .replace("{page}", &page.to_string())
    }

    fn to_listing(&self, job: OfficialApiJob) -> JobListing {
        let title = job.title.clone().unwrap_or_default().trim().to_string();
        let location = job
            .location
            .as_ref()
            .and_then(|l| l.display_name.clone())
            .unwrap_or_default();

        let salary = match (job.salary_min, job.salary_max) {
            (Some(min), Some(max)) => Some(format!(
                "{} - {} {}",
                min.round() as i64,
                max.round() as i64,
                self.currency
            )),
            _ => None,
        };

        let contract_type = match (job.contract_time.as_deref(), job.contract_type.as_deref()) {
            (_, Some("contract")) => ContractType::Freelance,
            (Some("part_time"), _) => ContractType::PartTime,
            (Some("full_time"), _) => ContractType::FullTime,
            _ => self.classifier.classify_contract_type(&title),
        };

        JobListing {
            id: job
                .id_string()
                .map(|id| format!("{}-{}", self.name, id))
                .unwrap_or_else(|| generate_job_id(&self.name)),
            experience_level: self.classifier.classify_experience_level(&title),
            remote: self
                .classifier
                .classify_remote_work(&format!("{} {}", title, location)),
            title,
            company: job
                .company
                .and_then(|c| c.display_name)
                .unwrap_or_default(),
            location,
            description: job.description.unwrap_or_default(),
            salary,
            contract_type,
            url: job.redirect_url.unwrap_or_default(),
            source: self.name.clone(),
            posted_date: parse_posted_date(job.created.as_deref()),
            match_score: None,
            is_favorite: false,
        }
    }
}

#[async_trait]
impl JobSource for OfficialApiSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn scrape(&self, filters: &ScrapeFilters) -> Result<Vec<JobListing>> {
        let url = self.endpoint_url(filters.page.unwrap_or(1));

        let mut params: Vec<(&str, String)> = vec![
            ("app_id", self.app_id.clone()),
            ("app_key", self.app_key.clone()),
            (
                "results_per_page",
                filters.limit.unwrap_or(DEFAULT_RESULTS_PER_PAGE).to_string(),
            ),
        ];
        if let Some(what) = &filters.query {
            params.push(("what", what.clone()));
        }
        if let Some(location) = &filters.location {
            params.push(("where", location.clone()));
        }
        if let Some(days) = filters.max_days_old {
            params.push(("max_days_old", days.to_string()));
        }

        debug!("Calling official job API {}: {}", self.name, url);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.name))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", self.name, status, error_text);
        }

        let body: OfficialApiResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", self.name))?;

        let listings: Vec<JobListing> = body
            .results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<OfficialApiJob>(value) {
                Ok(job) => Some(self.to_listing(job)),
                Err(e) => {
                    warn!("{}: skipping malformed result: {}", self.name, e);
                    None
                }
            })
            .collect();

        info!("{}: received {} jobs", self.name, listings.len());
        Ok(listings)
    }
}
