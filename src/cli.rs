// src/cli.rs
use crate::controller::{JobsController, SearchPhase};
use crate::core::{AppServices, ConfigManager};
use crate::currency::{convert_salary, format_salary};
use crate::types::{
    CandidateProfile, ContractType, ExperienceLevel, JobListing, JobSearchFilters, RemoteWork,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Multi-source job search and candidate matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Search every source of a country once and print the results
    Search {
        country: String,
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, short)]
        location: Option<String>,
        /// full-time, part-time, freelance, internship, apprenticeship
        #[arg(long, value_delimiter = ',', value_parser = parse_enum::<ContractType>)]
        contract: Vec<ContractType>,
        /// entry, intermediate, senior, executive
        #[arg(long, value_delimiter = ',', value_parser = parse_enum::<ExperienceLevel>)]
        experience: Vec<ExperienceLevel>,
        /// no, hybrid, full
        #[arg(long, value_delimiter = ',', value_parser = parse_enum::<RemoteWork>)]
        remote: Vec<RemoteWork>,
        /// Candidate profile JSON used to score the results
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Print the result set as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured countries, or the sources of one country
    Sources { country: Option<String> },
    /// Convert an amount between supported currencies
    Convert { amount: f64, from: String, to: String },
}

/// Parses a lowercase wire name ("full-time", "senior", "hybrid") into its enum
pub fn parse_enum<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_lowercase()))
        .map_err(|_| format!("unknown value '{}'", raw))
}

pub async fn handle_command(command: Command, config: ConfigManager) -> Result<()> {
    match command {
        Command::Serve => crate::web::start_web_server(config).await,
        Command::Search {
            country,
            query,
            location,
            contract,
            experience,
            remote,
            profile,
            json,
        } => {
            let filters = JobSearchFilters {
                contract_type: contract,
                experience_level: experience,
                remote,
                ..Default::default()
            }
            .with_query(query.unwrap_or_default())
            .with_location(location.unwrap_or_default());
            run_search(&config, &country, filters, profile, json).await
        }
        Command::Sources { country } => list_sources(&config, country.as_deref()),
        Command::Convert { amount, from, to } => {
            let converted = convert_salary(amount, &from, &to)?;
            println!(
                "{} = {}",
                format_salary(amount, &from.to_uppercase()),
                format_salary(converted, &to.to_uppercase())
            );
            Ok(())
        }
    }
}

fn load_profile_file(path: &Path) -> Result<CandidateProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid profile JSON: {}", path.display()))
}

async fn run_search(
    config: &ConfigManager,
    country: &str,
    filters: JobSearchFilters,
    profile: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let services = AppServices::from_config(config)?;
    if !services.scraper.supports_country(country) {
        anyhow::bail!(
            "Unsupported country: {} (available: {})",
            country,
            services.scraper.countries().join(", ")
        );
    }

    let controller = JobsController::new(
        services.scraper.clone(),
        services.engine.clone(),
        services.collaborator.clone(),
        country,
    );
    if let Some(path) = profile {
        controller.set_profile(load_profile_file(&path)?).await;
    }
    controller.update_filters(filters).await;

    let snapshot = controller.search_jobs().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if snapshot.phase == SearchPhase::Fallback {
        println!("Job sources unavailable, showing sample listings");
    }
    println!("{} jobs in {}", snapshot.total, snapshot.country);
    for job in &snapshot.jobs {
        println!("{}", summary_line(job));
    }
    Ok(())
}

fn summary_line(job: &JobListing) -> String {
    let score = job
        .match_score
        .map(|s| format!("{:>3}% ", s))
        .unwrap_or_default();
    let salary = job
        .salary
        .as_deref()
        .map(|s| format!(" | {}", s))
        .unwrap_or_default();
    format!(
        "{}{} @ {} ({}, {}, remote: {}) [{}]{}",
        score, job.title, job.company, job.location, job.contract_type, job.remote, job.source, salary
    )
}

fn list_sources(config: &ConfigManager, country: Option<&str>) -> Result<()> {
    let services = AppServices::from_config(config)?;
    match country {
        Some(country) => {
            let sources = services
                .registry
                .get(country)
                .with_context(|| format!("Unsupported country: {}", country))?;
            println!(
                "{} ({}, {})",
                sources.name, sources.country_code, sources.currency
            );
            for name in services.scraper.source_names(country) {
                println!("  {}", name);
            }
        }
        None => {
            for (key, sources) in &services.registry.countries {
                println!(
                    "{:<12} {:<14} {} sources",
                    key,
                    sources.name,
                    services.scraper.source_names(key).len()
                );
            }
        }
    }
    Ok(())
}
