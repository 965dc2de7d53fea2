// src/scraping/proxy.rs
//! Client for the internal `/api/scraping/...` endpoints that front the job boards

use super::ScrapeFilters;
use crate::types::response::{RawJobRecord, ScrapingProxyResponse};
use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ScrapingProxy {
    client: Client,
    base_url: String,
}

impl ScrapingProxy {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GET `{base}{path}` with `query`, `location`, `page` and `limit`, returning validated records
    pub async fn fetch(
        &self,
        path: &str,
        filters: &ScrapeFilters,
        source: &str,
    ) -> Result<Vec<RawJobRecord>> {
        let url = format!("{}{}", self.base_url, path);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(query) = &filters.query {
            params.push(("query", query.clone()));
        }
        if let Some(location) = &filters.location {
            params.push(("location", location.clone()));
        }
        if let Some(page) = filters.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = filters.limit {
            params.push(("limit", limit.to_string()));
        }

        debug!("Calling scraping proxy: {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to reach scraping proxy for {}", source))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!(
                "Scraping proxy returned {} for {}: {}",
                status,
                source,
                error_text
            );
        }

        let body: ScrapingProxyResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse scraping proxy response for {}", source))?;

        let records = body.into_records(source);
        info!("{}: received {} job records", source, records.len());
        Ok(records)
    }
}
