// src/lib.rs
//! Multi-source job search: per-country sources, candidate matching and search sessions

pub mod auth;
pub mod classifier;
pub mod cli;
pub mod controller;
pub mod core;
pub mod currency;
pub mod environment;
pub mod logging;
pub mod matching;
pub mod scraping;
pub mod types;
pub mod web;

pub use controller::{JobsController, SearchPhase, SessionManager};
pub use core::{AppServices, ConfigManager};
pub use matching::JobMatchingEngine;
pub use scraping::JobScrapingService;
pub use web::{build_rocket, start_web_server};
