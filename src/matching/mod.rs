// src/matching/mod.rs
//! Candidate-to-job scoring: skill overlap, experience, semantic similarity and location

pub mod engine;
pub mod inference;
pub mod location;
pub mod recommendations;
pub mod skills;
pub mod weights;

pub use engine::JobMatchingEngine;
pub use inference::{DisabledInference, HttpInferenceClient, InferenceBackend};
pub use recommendations::personalized_recommendations;
pub use weights::MatchingConfig;
