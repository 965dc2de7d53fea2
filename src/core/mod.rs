// src/core/mod.rs
//! Configuration, outbound service clients and service wiring

pub mod config_manager;
pub mod service_client;
pub mod services;

pub use config_manager::ConfigManager;
pub use service_client::{CollaboratorApi, ServiceClient};
pub use services::AppServices;
