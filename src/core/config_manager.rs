// src/core/config_manager.rs
//! Unified configuration: `config.yaml` section for the environment, overridden by env vars

use crate::environment::FileSettings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_PORT: u16 = 8100;
const DEFAULT_SCRAPING_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_COLLABORATOR_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_NER_MODEL: &str = "dslim/bert-base-NER";
const DEFAULT_SIMILARITY_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RESULTS_PER_SOURCE: u32 = 20;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub port: u16,
    pub service: ServiceConfig,
    pub sources_file: Option<PathBuf>,
    pub default_country: String,
    pub results_per_source: u32,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub scraping_api_url: String,
    pub collaborator_api_url: String,
    pub timeout_seconds: u64,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub base_url: String,
    /// Without a key the engine skips remote inference and uses local fallbacks
    pub api_key: Option<String>,
    pub ner_model: String,
    pub similarity_model: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scraping_api_url: DEFAULT_SCRAPING_URL.to_string(),
            collaborator_api_url: DEFAULT_COLLABORATOR_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            inference: InferenceConfig::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            api_key: None,
            ner_model: DEFAULT_NER_MODEL.to_string(),
            similarity_model: DEFAULT_SIMILARITY_MODEL.to_string(),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, raw)),
        None => Ok(None),
    }
}

impl ConfigManager {
    /// Load `config.yaml` (or `JOBMATCH_CONFIG`) and apply environment overrides
    pub fn load() -> Result<Self> {
        let environment = FileSettings::current_environment();
        let config_path = env_string("JOBMATCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.yaml"));
        let file = FileSettings::load(&environment, &config_path)?;
        Self::from_settings(environment, file)
    }

    pub fn from_settings(environment: String, file: FileSettings) -> Result<Self> {
        let port = env_parsed::<u16>("JOBMATCH_PORT")?
            .or(env_parsed::<u16>("ROCKET_PORT")?)
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let timeout_seconds = env_parsed::<u64>("HTTP_TIMEOUT_SECS")?
            .or(file.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let inference = InferenceConfig {
            base_url: env_string("INFERENCE_API_URL")
                .or(file.inference_api_url)
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            api_key: env_string("INFERENCE_API_KEY").or(file.inference_api_key),
            ner_model: env_string("NER_MODEL")
                .or(file.ner_model)
                .unwrap_or_else(|| DEFAULT_NER_MODEL.to_string()),
            similarity_model: env_string("SIMILARITY_MODEL")
                .or(file.similarity_model)
                .unwrap_or_else(|| DEFAULT_SIMILARITY_MODEL.to_string()),
        };

        let service = ServiceConfig {
            scraping_api_url: env_string("SCRAPING_API_URL")
                .or(file.scraping_api_url)
                .unwrap_or_else(|| DEFAULT_SCRAPING_URL.to_string()),
            collaborator_api_url: env_string("COLLABORATOR_API_URL")
                .or(file.collaborator_api_url)
                .unwrap_or_else(|| DEFAULT_COLLABORATOR_URL.to_string()),
            timeout_seconds,
            inference,
        };

        let sources_file = match env_string("SOURCES_FILE")
            .map(PathBuf::from)
            .or(file.sources_file)
        {
            Some(path) => Some(
                FileSettings::resolve_path(&path).context("Failed to resolve sources file")?,
            ),
            None => None,
        };

        let config = Self {
            environment,
            port,
            service,
            sources_file,
            default_country: env_string("DEFAULT_COUNTRY")
                .or(file.default_country)
                .unwrap_or_else(|| "france".to_string())
                .to_lowercase(),
            results_per_source: env_parsed::<u32>("RESULTS_PER_SOURCE")?
                .or(file.results_per_source)
                .unwrap_or(DEFAULT_RESULTS_PER_SOURCE),
        };

        info!(
            "Configuration loaded: environment={}, port={}, scraping={}, inference key set={}",
            config.environment,
            config.port,
            config.service.scraping_api_url,
            config.service.inference.api_key.is_some()
        );
        Ok(config)
    }
}
