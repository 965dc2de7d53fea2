// src/core/service_client.rs
//! Client for the collaborator backend that owns user profiles and favorites

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use crate::types::CandidateProfile;

const PROFILE_ENDPOINT: &str = "/api/user/cv";
const FAVORITES_ENDPOINT: &str = "/api/user/favorites";

#[async_trait]
pub trait CollaboratorApi: Send + Sync {
    async fn fetch_candidate_profile(&self, token: Option<&str>) -> Result<CandidateProfile>;

    async fn save_favorite(&self, token: Option<&str>, job_id: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoritePayload<'a> {
    job_id: &'a str,
}

#[derive(Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn error_for(response: reqwest::Response, what: &str) -> anyhow::Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("{} failed with status {}: {}", what, status, error_text);
        anyhow::anyhow!("{} failed with status {}: {}", what, status, error_text)
    }
}

#[async_trait]
impl CollaboratorApi for ServiceClient {
    async fn fetch_candidate_profile(&self, token: Option<&str>) -> Result<CandidateProfile> {
        let url = format!("{}{}", self.base_url, PROFILE_ENDPOINT);
        debug!("Fetching candidate profile: {}", url);

        let response = self
            .authorized(self.client.get(&url), token)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "Profile fetch").await);
        }

        response
            .json::<CandidateProfile>()
            .await
            .context("Failed to parse candidate profile")
    }

    async fn save_favorite(&self, token: Option<&str>, job_id: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, FAVORITES_ENDPOINT);
        debug!("Saving favorite {} to {}", job_id, url);

        let response = self
            .authorized(self.client.post(&url), token)
            .json(&FavoritePayload { job_id })
            .send()
            .await
            .with_context(|| format!("Failed to POST to {}", url))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, "Favorite save").await);
        }
        Ok(())
    }
}
