// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// One environment section of `config.yaml`. Every key is optional; environment
/// variables take precedence over whatever is set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub port: Option<u16>,
    pub scraping_api_url: Option<String>,
    pub collaborator_api_url: Option<String>,
    pub inference_api_url: Option<String>,
    pub inference_api_key: Option<String>,
    pub ner_model: Option<String>,
    pub similarity_model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub sources_file: Option<PathBuf>,
    pub default_country: Option<String>,
    pub results_per_source: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: FileSettings,
    #[serde(default)]
    production: FileSettings,
}

impl FileSettings {
    pub fn current_environment() -> String {
        std::env::var("JOBMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Missing file means "all defaults"; a file that exists but does not parse is an error
    pub fn load(environment: &str, path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "{} not found, using environment variables and defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(environment, &content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(environment: &str, content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        info!("Loading configuration for environment: {}", environment);
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    pub fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  port: 8100
  scraping_api_url: http://localhost:3000
production:
  port: 80
  default_country: morocco
"#;

    #[test]
    fn test_selects_environment_section() {
        let local = FileSettings::from_yaml("local", SAMPLE).unwrap();
        assert_eq!(local.port, Some(8100));
        assert_eq!(local.scraping_api_url.as_deref(), Some("http://localhost:3000"));

        let prod = FileSettings::from_yaml("production", SAMPLE).unwrap();
        assert_eq!(prod.port, Some(80));
        assert_eq!(prod.default_country.as_deref(), Some("morocco"));
        assert!(prod.scraping_api_url.is_none());
    }

    #[test]
    fn test_unknown_environment_falls_back_to_local() {
        let settings = FileSettings::from_yaml("staging", SAMPLE).unwrap();
        assert_eq!(settings.port, Some(8100));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let settings = FileSettings::load("production", &path).unwrap();
        assert_eq!(settings.port, Some(80));

        std::fs::write(&path, "local: 42").unwrap();
        assert!(FileSettings::load("local", &path).is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings =
            FileSettings::load("local", Path::new("/nonexistent/jobmatch/config.yaml")).unwrap();
        assert!(settings.port.is_none());
    }
}
