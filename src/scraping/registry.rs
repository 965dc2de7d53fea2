// src/scraping/registry.rs
//! Per-country source configuration: official APIs and scraping targets

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const ADZUNA_ENDPOINT: &str = "https://api.adzuna.com/v1/api/jobs/{country}/search/{page}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRegistry {
    pub countries: BTreeMap<String, CountrySources>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySources {
    pub name: String,
    /// ISO-3166 alpha-2 code used in official API endpoints
    pub country_code: String,
    pub currency: String,
    #[serde(default)]
    pub apis: Vec<ApiSourceConfig>,
    #[serde(default)]
    pub scrapers: Vec<ScraperTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSourceConfig {
    pub name: String,
    pub endpoint: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScraperKind {
    Indeed,
    Linkedin,
    African,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperTarget {
    pub kind: ScraperKind,
    /// Board identifier, required for regional targets
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ApiSourceConfig {
    pub fn has_credentials(&self) -> bool {
        matches!((&self.app_id, &self.app_key), (Some(id), Some(key)) if !id.is_empty() && !key.is_empty())
    }
}

impl ScraperTarget {
    fn board(kind: ScraperKind) -> Self {
        Self {
            kind,
            site: None,
            enabled: true,
        }
    }

    fn regional(site: &str) -> Self {
        Self {
            kind: ScraperKind::African,
            site: Some(site.to_string()),
            enabled: true,
        }
    }
}

fn adzuna() -> ApiSourceConfig {
    ApiSourceConfig {
        name: "adzuna".to_string(),
        endpoint: ADZUNA_ENDPOINT.to_string(),
        enabled: true,
        app_id: None,
        app_key: None,
    }
}

fn country(
    name: &str,
    code: &str,
    currency: &str,
    apis: Vec<ApiSourceConfig>,
    scrapers: Vec<ScraperTarget>,
) -> CountrySources {
    CountrySources {
        name: name.to_string(),
        country_code: code.to_string(),
        currency: currency.to_string(),
        apis,
        scrapers,
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        use ScraperKind::{Indeed, Linkedin};
        let boards = || vec![ScraperTarget::board(Indeed), ScraperTarget::board(Linkedin)];

        let entries = [
            ("france", country("France", "fr", "EUR", vec![adzuna()], boards())),
            ("uk", country("United Kingdom", "gb", "GBP", vec![adzuna()], boards())),
            ("germany", country("Germany", "de", "EUR", vec![adzuna()], boards())),
            ("spain", country("Spain", "es", "EUR", vec![adzuna()], boards())),
            ("italy", country("Italy", "it", "EUR", vec![adzuna()], boards())),
            ("netherlands", country("Netherlands", "nl", "EUR", vec![adzuna()], boards())),
            (
                "morocco",
                country(
                    "Morocco",
                    "ma",
                    "MAD",
                    vec![],
                    vec![
                        ScraperTarget::board(Indeed),
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("rekrute"),
                        ScraperTarget::regional("emploi-ma"),
                    ],
                ),
            ),
            (
                "tunisia",
                country(
                    "Tunisia",
                    "tn",
                    "TND",
                    vec![],
                    vec![
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("tanitjobs"),
                    ],
                ),
            ),
            (
                "algeria",
                country(
                    "Algeria",
                    "dz",
                    "DZD",
                    vec![],
                    vec![
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("emploitic"),
                    ],
                ),
            ),
            (
                "senegal",
                country(
                    "Senegal",
                    "sn",
                    "XOF",
                    vec![],
                    vec![
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("emploidakar"),
                    ],
                ),
            ),
            (
                "cotedivoire",
                country(
                    "Côte d'Ivoire",
                    "ci",
                    "XOF",
                    vec![],
                    vec![
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("educarriere"),
                    ],
                ),
            ),
            (
                "southafrica",
                country(
                    "South Africa",
                    "za",
                    "ZAR",
                    vec![adzuna()],
                    vec![
                        ScraperTarget::board(Indeed),
                        ScraperTarget::board(Linkedin),
                        ScraperTarget::regional("careers24"),
                    ],
                ),
            ),
        ];

        Self {
            countries: entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }
}

impl SourceRegistry {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let registry: Self = serde_yaml::from_str(content).context("Invalid sources file")?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sources file: {}", path.display()))?;
        let registry = Self::from_yaml(&content)?;
        info!(
            "Loaded {} countries from {}",
            registry.countries.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Keys are matched case-insensitively
    pub fn get(&self, country: &str) -> Option<&CountrySources> {
        self.countries.get(&country.to_lowercase())
    }

    pub fn country_keys(&self) -> Vec<String> {
        self.countries.keys().cloned().collect()
    }

    /// Fill missing API credentials from `{NAME}_APP_ID` / `{NAME}_APP_KEY`
    pub fn with_env_credentials(mut self) -> Self {
        for sources in self.countries.values_mut() {
            for api in &mut sources.apis {
                let prefix = api.name.to_uppercase().replace('-', "_");
                if api.app_id.is_none() {
                    api.app_id = std::env::var(format!("{}_APP_ID", prefix)).ok();
                }
                if api.app_key.is_none() {
                    api.app_key = std::env::var(format!("{}_APP_KEY", prefix)).ok();
                }
            }
        }
        self
    }

    fn validate(&self) -> Result<()> {
        for (key, sources) in &self.countries {
            if key.to_lowercase() != *key {
                anyhow::bail!("Country key '{}' must be lowercase", key);
            }
            for target in &sources.scrapers {
                if target.kind == ScraperKind::African && target.site.is_none() {
                    anyhow::bail!("Regional scraper for '{}' is missing its site", key);
                }
            }
        }
        Ok(())
    }
}
