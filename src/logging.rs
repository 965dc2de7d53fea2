// src/logging.rs
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "job_matcher=info,jobmatch=info,rocket::server=off";

/// `RUST_LOG` overrides the default filter. `LOG_FORMAT=json` switches stdout to
/// JSON lines and `LOG_FILE` adds a JSON log file, truncated on startup.
pub fn init_tracing() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file_layer = match std::env::var("LOG_FILE") {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        Err(_) => None,
    };

    let stdout_json = json.then(|| fmt::layer().json());
    let stdout_plain = (!json).then(|| fmt::layer());

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stdout_json)
        .with(stdout_plain)
        .try_init();
    Ok(())
}
