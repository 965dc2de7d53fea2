// src/matching/recommendations.rs
use crate::types::{
    JobListing, JobMatchScore, PersonalizedRecommendation, Priority, RecommendationType,
    RemoteWork,
};
use std::collections::HashMap;

/// Advice attached to a single match, by score tier
pub fn score_recommendations(score: u8) -> Vec<String> {
    let tier: &[&str] = if score >= 80 {
        &[
            "Excellent match: apply quickly while the offer is fresh",
            "Highlight your most relevant achievements in your cover letter",
            "Prepare concrete examples of projects using the required skills",
        ]
    } else if score >= 60 {
        &[
            "Good match: tailor your CV to emphasize the skills this role asks for",
            "Mention transferable experience for the requirements you only partly meet",
            "Research the company to strengthen your motivation letter",
        ]
    } else {
        &[
            "This role is a stretch: focus on closing the missing skills first",
            "Consider training or certifications in the technologies listed",
            "Look for similar positions at a more junior level",
        ]
    };
    tier.iter().map(|s| s.to_string()).collect()
}

pub fn generic_recommendations() -> Vec<String> {
    vec![
        "Review the job description carefully and compare it to your profile".to_string(),
        "Tailor your CV to the key requirements of the role".to_string(),
    ]
}

const TOP_MISSING_SKILLS: usize = 3;
const REMOTE_SHARE_THRESHOLD: f64 = 0.3;
const LOW_EXPERIENCE_SCORE: f64 = 60.0;

/// Advice derived from the whole result set; `scores` holds whatever matches are cached
pub fn personalized_recommendations(
    jobs: &[JobListing],
    scores: &HashMap<String, JobMatchScore>,
) -> Vec<PersonalizedRecommendation> {
    let mut recommendations = Vec::new();
    if jobs.is_empty() {
        return recommendations;
    }

    let scored: Vec<&JobMatchScore> = jobs.iter().filter_map(|j| scores.get(&j.id)).collect();

    // Most frequent missing skills, ties broken by first appearance
    let mut counts: Vec<(String, usize)> = Vec::new();
    for score in &scored {
        for skill in &score.missing_skills {
            match counts.iter_mut().find(|(s, _)| s.eq_ignore_ascii_case(skill)) {
                Some((_, n)) => *n += 1,
                None => counts.push((skill.clone(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some((top_skill, top_count)) = counts.first().cloned() {
        let skills: Vec<String> = counts
            .iter()
            .take(TOP_MISSING_SKILLS)
            .map(|(s, _)| s.clone())
            .collect();
        let priority = if top_count * 2 >= scored.len() {
            Priority::High
        } else {
            Priority::Medium
        };
        recommendations.push(PersonalizedRecommendation {
            kind: RecommendationType::SkillGap,
            title: format!("Learn {}", top_skill),
            description: format!(
                "{} of {} matched offers ask for {}. Skills most often missing: {}.",
                top_count,
                scored.len(),
                top_skill,
                skills.join(", ")
            ),
            action_items: skills
                .iter()
                .map(|s| format!("Follow a hands-on course or build a small project with {}", s))
                .collect(),
            priority,
        });
    }

    let with_salary = jobs.iter().filter(|j| j.salary.is_some()).count();
    if with_salary > 0 {
        recommendations.push(PersonalizedRecommendation {
            kind: RecommendationType::SalaryNegotiation,
            title: "Use published salaries in your negotiation".to_string(),
            description: format!(
                "{} of {} offers publish a salary range you can benchmark against.",
                with_salary,
                jobs.len()
            ),
            action_items: vec![
                "Compare the published ranges for similar titles".to_string(),
                "Anchor your expectations on the upper half of the range".to_string(),
                "Ask about benefits and remote allowances as well".to_string(),
            ],
            priority: Priority::Low,
        });
    }

    let flexible = jobs
        .iter()
        .filter(|j| matches!(j.remote, RemoteWork::Full | RemoteWork::Hybrid))
        .count();
    let share = flexible as f64 / jobs.len() as f64;
    if share >= REMOTE_SHARE_THRESHOLD {
        recommendations.push(PersonalizedRecommendation {
            kind: RecommendationType::LocationAdvice,
            title: "Widen your search to remote roles".to_string(),
            description: format!(
                "{:.0}% of the offers allow remote or hybrid work.",
                share * 100.0
            ),
            action_items: vec![
                "Add the remote and hybrid filters to your search".to_string(),
                "Mention your remote collaboration experience in your CV".to_string(),
            ],
            priority: Priority::Medium,
        });
    }

    if !scored.is_empty() {
        let average = scored
            .iter()
            .map(|s| s.breakdown.experience_match as f64)
            .sum::<f64>()
            / scored.len() as f64;
        if average < LOW_EXPERIENCE_SCORE {
            recommendations.push(PersonalizedRecommendation {
                kind: RecommendationType::ExperienceBoost,
                title: "Strengthen your experience section".to_string(),
                description: format!(
                    "Your experience scores {:.0}/100 on average against these offers.",
                    average
                ),
                action_items: vec![
                    "Detail freelance, volunteer and side projects as experience".to_string(),
                    "Quantify the impact of each past role".to_string(),
                    "Target entry or intermediate level offers".to_string(),
                ],
                priority: Priority::High,
            });
        }
    }

    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractType, ExperienceLevel, MatchBreakdown};
    use chrono::Utc;

    fn job(id: &str, remote: RemoteWork, salary: Option<&str>) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: format!("Job {}", id),
            company: "Acme".to_string(),
            location: "Paris".to_string(),
            description: String::new(),
            salary: salary.map(str::to_string),
            contract_type: ContractType::FullTime,
            experience_level: ExperienceLevel::Intermediate,
            remote,
            url: String::new(),
            source: "test".to_string(),
            posted_date: Utc::now(),
            match_score: None,
            is_favorite: false,
        }
    }

    fn score(id: &str, experience: u8, missing: &[&str]) -> JobMatchScore {
        JobMatchScore {
            job_id: id.to_string(),
            overall_score: 50,
            breakdown: MatchBreakdown {
                skills_match: 50,
                experience_match: experience,
                location_match: 50,
                salary_match: 50,
                remote_pref_match: 70,
            },
            recommendations: vec![],
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_score_tiers() {
        assert!(score_recommendations(85)[0].starts_with("Excellent"));
        assert!(score_recommendations(80)[0].starts_with("Excellent"));
        assert!(score_recommendations(79)[0].starts_with("Good"));
        assert!(score_recommendations(60)[0].starts_with("Good"));
        assert!(score_recommendations(59)[0].starts_with("This role"));
    }

    #[test]
    fn test_empty_result_set() {
        assert!(personalized_recommendations(&[], &HashMap::new()).is_empty());
    }

    #[test]
    fn test_personalized_recommendations() {
        let jobs = vec![
            job("1", RemoteWork::Full, Some("40000 - 50000 EUR")),
            job("2", RemoteWork::No, None),
            job("3", RemoteWork::Hybrid, None),
        ];
        let scores: HashMap<String, JobMatchScore> = [
            score("1", 30, &["Docker", "AWS"]),
            score("2", 60, &["docker"]),
            score("3", 30, &["Kubernetes"]),
        ]
        .into_iter()
        .map(|s| (s.job_id.clone(), s))
        .collect();

        let recs = personalized_recommendations(&jobs, &scores);
        let kinds: Vec<RecommendationType> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationType::SkillGap,
                RecommendationType::ExperienceBoost,
                RecommendationType::LocationAdvice,
                RecommendationType::SalaryNegotiation,
            ]
        );
        assert_eq!(recs[0].title, "Learn Docker");
        assert_eq!(recs[0].priority, Priority::High);
    }
}
