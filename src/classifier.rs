// src/classifier.rs
//! Keyword classification of free-text job attributes

use crate::matching::skills::contains_term;
use crate::types::{ContractType, ExperienceLevel, RemoteWork};

/// Maps free text onto the fixed job enums. Implementations must be total.
pub trait JobClassifier: Send + Sync {
    fn classify_contract_type(&self, text: &str) -> ContractType;
    fn classify_experience_level(&self, text: &str) -> ExperienceLevel;
    fn classify_remote_work(&self, text: &str) -> RemoteWork;
}

// Checked in order, first hit wins. Each entry is (value, substrings, whole words):
// short or ambiguous keywords only count as whole words, so "cto" stays out of "vector"
type KeywordTable<T> = [(T, &'static [&'static str], &'static [&'static str])];

const CONTRACT_KEYWORDS: &KeywordTable<ContractType> = &[
    (
        ContractType::Apprenticeship,
        &["apprenticeship", "alternance", "apprentissage", "ausbildung"],
        &["apprentice", "apprentices"],
    ),
    (
        ContractType::Internship,
        &["internship", "stagiaire", "praktikum"],
        &["intern", "interns", "stage", "stages"],
    ),
    (
        ContractType::Freelance,
        &["freelance", "contractor", "indépendant", "independant"],
        &["contract"],
    ),
    (
        ContractType::PartTime,
        &["part-time", "part time", "temps partiel", "mi-temps", "teilzeit"],
        &[],
    ),
];

// Salaried wording that mentions a contract without meaning freelance work
const PERMANENT_CONTRACT_PHRASES: &[&str] = &[
    "permanent contract",
    "employment contract",
    "full-time contract",
    "full time contract",
];

const EXPERIENCE_KEYWORDS: &KeywordTable<ExperienceLevel> = &[
    (
        ExperienceLevel::Executive,
        &["director", "directeur", "executive"],
        &["head of", "vp", "chief", "cto", "ceo"],
    ),
    (
        ExperienceLevel::Senior,
        &["senior", "principal", "confirmé"],
        &["sr.", "sr", "lead", "leader", "expert"],
    ),
    (
        ExperienceLevel::Entry,
        &["junior", "graduate", "débutant", "trainee"],
        &["jr.", "jr", "entry"],
    ),
];

const REMOTE_KEYWORDS: &KeywordTable<RemoteWork> = &[
    (
        RemoteWork::Hybrid,
        &["hybrid", "hybride", "partial remote", "télétravail partiel"],
        &[],
    ),
    (
        RemoteWork::Full,
        &[
            "remote",
            "télétravail",
            "teletravail",
            "work from home",
            "full remote",
            "100% remote",
        ],
        &[],
    ),
];

fn first_match<T: Copy>(lower: &str, table: &KeywordTable<T>, default: T) -> T {
    table
        .iter()
        .find(|(_, substrings, words)| {
            substrings.iter().any(|k| lower.contains(k))
                || words.iter().any(|w| contains_term(lower, w))
        })
        .map(|(value, _, _)| *value)
        .unwrap_or(default)
}

/// Case-insensitive keyword matching against fixed vocabularies.
/// No match falls back to full-time, intermediate and on-site.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl JobClassifier for KeywordClassifier {
    fn classify_contract_type(&self, text: &str) -> ContractType {
        let mut lower = text.to_lowercase();
        for phrase in PERMANENT_CONTRACT_PHRASES {
            lower = lower.replace(phrase, "permanent");
        }
        first_match(&lower, CONTRACT_KEYWORDS, ContractType::FullTime)
    }

    fn classify_experience_level(&self, text: &str) -> ExperienceLevel {
        first_match(
            &text.to_lowercase(),
            EXPERIENCE_KEYWORDS,
            ExperienceLevel::Intermediate,
        )
    }

    fn classify_remote_work(&self, text: &str) -> RemoteWork {
        first_match(&text.to_lowercase(), REMOTE_KEYWORDS, RemoteWork::No)
    }
}

pub fn parse_contract_type(text: &str) -> ContractType {
    KeywordClassifier.classify_contract_type(text)
}

pub fn parse_experience_level(text: &str) -> ExperienceLevel {
    KeywordClassifier.classify_experience_level(text)
}

pub fn parse_remote_work(text: &str) -> RemoteWork {
    KeywordClassifier.classify_remote_work(text)
}
