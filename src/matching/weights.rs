// src/matching/weights.rs
use crate::types::ExperienceLevel;

pub const DEFAULT_WEIGHTS: Weights = Weights {
    skills: 0.30,
    experience: 0.25,
    semantic: 0.20,
    location: 0.10,
    salary: 0.10,
    remote: 0.05,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub experience: f64,
    pub semantic: f64,
    pub location: f64,
    pub salary: f64,
    pub remote: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.semantic + self.location + self.salary + self.remote
    }
}

/// Minimum years of experience expected at each level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredYears {
    pub entry: f64,
    pub intermediate: f64,
    pub senior: f64,
    pub executive: f64,
}

impl Default for RequiredYears {
    fn default() -> Self {
        Self {
            entry: 0.0,
            intermediate: 2.0,
            senior: 5.0,
            executive: 10.0,
        }
    }
}

impl RequiredYears {
    pub fn for_level(&self, level: ExperienceLevel) -> f64 {
        match level {
            ExperienceLevel::Entry => self.entry,
            ExperienceLevel::Intermediate => self.intermediate,
            ExperienceLevel::Senior => self.senior,
            ExperienceLevel::Executive => self.executive,
        }
    }
}

pub const DEFAULT_SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C#",
    "C++",
    "PHP",
    "Ruby",
    "Golang",
    "Rust",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Django",
    "Spring",
    "Laravel",
    "SQL",
    "PostgreSQL",
    "MongoDB",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "Git",
    "HTML",
    "CSS",
    "Machine Learning",
];

/// Everything the engine needs besides the inference backend
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: Weights,
    pub required_years: RequiredYears,
    /// Minimum normalized Levenshtein similarity for two skills to count as equal
    pub fuzzy_threshold: f64,
    pub skill_vocabulary: Vec<String>,
    pub placeholder_score: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            required_years: RequiredYears::default(),
            fuzzy_threshold: 0.8,
            skill_vocabulary: DEFAULT_SKILL_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            placeholder_score: 65,
        }
    }
}
