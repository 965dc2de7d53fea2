// src/core/services.rs
//! Wires the long-lived services from configuration; shared by the server and the CLI

use crate::classifier::{JobClassifier, KeywordClassifier};
use crate::controller::SessionManager;
use crate::core::service_client::{CollaboratorApi, ServiceClient};
use crate::core::ConfigManager;
use crate::matching::{
    DisabledInference, HttpInferenceClient, InferenceBackend, JobMatchingEngine, MatchingConfig,
};
use crate::scraping::{JobPageScraper, JobScrapingService, ScrapingProxy, SourceRegistry};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

const USER_AGENT: &str = concat!("jobmatch/", env!("CARGO_PKG_VERSION"));

pub struct AppServices {
    pub registry: SourceRegistry,
    pub scraper: Arc<JobScrapingService>,
    pub engine: Arc<JobMatchingEngine>,
    pub collaborator: Arc<dyn CollaboratorApi>,
    pub importer: JobPageScraper,
}

impl AppServices {
    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        let registry = match &config.sources_file {
            Some(path) => SourceRegistry::from_file(path)?,
            None => SourceRegistry::default(),
        }
        .with_env_credentials();

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.service.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let classifier: Arc<dyn JobClassifier> = Arc::new(KeywordClassifier);
        let proxy = ScrapingProxy::new(client.clone(), config.service.scraping_api_url.clone());
        let scraper = JobScrapingService::from_registry(
            &registry,
            client,
            proxy,
            classifier.clone(),
            config.results_per_source,
        );

        let inference: Arc<dyn InferenceBackend> = if config.service.inference.api_key.is_some() {
            info!(
                "Remote inference enabled: {}",
                config.service.inference.base_url
            );
            Arc::new(HttpInferenceClient::new(
                &config.service.inference,
                config.service.timeout_seconds,
            )?)
        } else {
            warn!("INFERENCE_API_KEY not set, matching uses local skill extraction only");
            Arc::new(DisabledInference)
        };
        let engine = JobMatchingEngine::new(inference, MatchingConfig::default());

        let collaborator = ServiceClient::new(
            &config.service.collaborator_api_url,
            config.service.timeout_seconds,
        )?;
        let importer = JobPageScraper::new(config.service.timeout_seconds, classifier)?;

        Ok(Self {
            registry,
            scraper: Arc::new(scraper),
            engine: Arc::new(engine),
            collaborator: Arc::new(collaborator),
            importer,
        })
    }

    pub fn session_manager(&self, default_country: &str) -> SessionManager {
        SessionManager::new(
            self.scraper.clone(),
            self.engine.clone(),
            self.collaborator.clone(),
            default_country,
        )
    }
}
