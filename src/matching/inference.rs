// src/matching/inference.rs
//! Remote NLP used by the matching engine: named-entity skill extraction and text similarity

use crate::core::config_manager::InferenceConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Skill-like entities found in a job description
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>>;

    /// Semantic similarity of two texts in [0, 1]
    async fn similarity(&self, source: &str, target: &str) -> Result<f64>;
}

/// Used when no inference credentials are configured; every call fails so the
/// engine takes its local fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledInference;

#[async_trait]
impl InferenceBackend for DisabledInference {
    async fn extract_skills(&self, _text: &str) -> Result<Vec<String>> {
        anyhow::bail!("Inference backend not configured")
    }

    async fn similarity(&self, _source: &str, _target: &str) -> Result<f64> {
        anyhow::bail!("Inference backend not configured")
    }
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    #[serde(default, alias = "entity")]
    entity_group: Option<String>,
    word: String,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Debug, Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: [&'a str; 1],
}

const MIN_ENTITY_SCORE: f64 = 0.5;
// Entity groups that never denote a skill
const NON_SKILL_GROUPS: &[&str] = &["PER", "LOC", "ORG"];
const MAX_INPUT_CHARS: usize = 4000;

/// Hosted-inference style client (`POST {base}/models/{model}`)
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
    api_key: String,
    ner_model: String,
    similarity_model: String,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig, timeout_seconds: u64) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("INFERENCE_API_KEY is not set")?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            ner_model: config.ner_model.clone(),
            similarity_model: config.similarity_model.clone(),
        })
    }

    async fn post_model<T, R>(&self, model: &str, payload: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}/models/{}", self.base_url, model);
        debug!("Calling inference model: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach inference model {}", model))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Inference API error {}: {}", status, error_text);
            anyhow::bail!("Inference API returned error {}: {}", status, error_text);
        }

        response
            .json::<R>()
            .await
            .with_context(|| format!("Failed to parse response from {}", model))
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceClient {
    async fn extract_skills(&self, text: &str) -> Result<Vec<String>> {
        let entities: Vec<NerEntity> = self
            .post_model(&self.ner_model, &NerRequest { inputs: truncate(text) })
            .await?;

        let mut skills: Vec<String> = Vec::new();
        for entity in entities {
            if entity.score.unwrap_or(1.0) < MIN_ENTITY_SCORE {
                continue;
            }
            if let Some(group) = &entity.entity_group {
                let group = group.trim_start_matches("B-").trim_start_matches("I-");
                if NON_SKILL_GROUPS.contains(&group) {
                    continue;
                }
            }
            // Sub-word pieces come back prefixed with "##"
            let word = entity.word.trim().trim_start_matches("##").to_string();
            if word.chars().count() > 1 && !skills.iter().any(|s| s.eq_ignore_ascii_case(&word)) {
                skills.push(word);
            }
        }
        Ok(skills)
    }

    async fn similarity(&self, source: &str, target: &str) -> Result<f64> {
        let request = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: truncate(source),
                sentences: [truncate(target)],
            },
        };
        let scores: Vec<f64> = self.post_model(&self.similarity_model, &request).await?;
        let score = scores
            .first()
            .copied()
            .context("Similarity model returned no scores")?;
        Ok(score.clamp(0.0, 1.0))
    }
}
