// src/types/response.rs
//! Raw payloads returned by upstream job sources, before normalization

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Envelope returned by the internal `/api/scraping/...` proxy endpoints
#[derive(Debug, Deserialize)]
pub struct ScrapingProxyResponse {
    #[serde(default)]
    pub jobs: Vec<serde_json::Value>,
}

/// One job as the scraping proxy reports it. Every field is optional upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawJobRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "companyName")]
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "summary", alias = "snippet")]
    pub description: Option<String>,
    pub salary: Option<String>,
    #[serde(alias = "contract_type", alias = "jobType")]
    pub contract_type: Option<String>,
    #[serde(alias = "experience_level", alias = "seniority")]
    pub experience_level: Option<String>,
    #[serde(alias = "remoteWork", alias = "workplaceType")]
    pub remote: Option<String>,
    #[serde(alias = "link", alias = "href")]
    pub url: Option<String>,
    #[serde(alias = "posted_date", alias = "datePosted", alias = "date")]
    pub posted_date: Option<String>,
}

impl ScrapingProxyResponse {
    /// Validates each element on its own so one malformed entry does not sink the batch
    pub fn into_records(self, source: &str) -> Vec<RawJobRecord> {
        self.jobs
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                if !value.is_object() {
                    warn!("{}: skipping non-object job entry at index {}", source, index);
                    return None;
                }
                match serde_json::from_value::<RawJobRecord>(value) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("{}: skipping malformed job entry {}: {}", source, index, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Adzuna-style official API search response
#[derive(Debug, Deserialize)]
pub struct OfficialApiResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfficialApiJob {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub company: Option<NamedEntity>,
    pub location: Option<NamedEntity>,
    pub description: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub contract_time: Option<String>,
    pub contract_type: Option<String>,
    pub redirect_url: Option<String>,
    pub created: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedEntity {
    pub display_name: Option<String>,
}

impl OfficialApiJob {
    /// The API sends ids as either strings or numbers
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}
