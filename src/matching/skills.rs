// src/matching/skills.rs
use strsim::normalized_levenshtein;

pub fn skills_equivalent(a: &str, b: &str, threshold: f64) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || normalized_levenshtein(&a, &b) >= threshold
}

/// Job skills the candidate covers, and the ones left uncovered, in job order
pub fn partition_skills(
    job_skills: &[String],
    candidate_skills: &[String],
    threshold: f64,
) -> (Vec<String>, Vec<String>) {
    job_skills.iter().cloned().partition(|job_skill| {
        candidate_skills
            .iter()
            .any(|c| skills_equivalent(job_skill, c, threshold))
    })
}

fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '+' || c == '#'),
    }
}

/// Case-insensitive whole-term search, so "Java" does not fire on "JavaScript"
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack_lower[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before = haystack_lower[..start].chars().next_back();
        let after = haystack_lower[end..].chars().next();
        // A trailing '.' is sentence punctuation unless another word char follows it
        let after_ok = is_boundary(after)
            || (after == Some('.') && is_boundary(haystack_lower[end + 1..].chars().next()));
        if is_boundary(before) && after_ok {
            return true;
        }
        from = start + haystack_lower[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Vocabulary terms present in the text, in vocabulary order
pub fn extract_vocabulary_skills(text: &str, vocabulary: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|term| contains_term(&lower, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::weights::DEFAULT_SKILL_VOCABULARY;

    fn vocabulary() -> Vec<String> {
        DEFAULT_SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fuzzy_equivalence() {
        assert!(skills_equivalent("JavaScript", "javascript", 0.8));
        assert!(skills_equivalent("Postgresql", "PostgreSQL ", 0.8));
        assert!(skills_equivalent("Kubernetes", "Kubernets", 0.8));
        assert!(!skills_equivalent("React", "Node.js", 0.8));
        assert!(!skills_equivalent("Java", "JavaScript", 0.8));
        assert!(!skills_equivalent("", "", 0.8));
    }

    #[test]
    fn test_partition_skills() {
        let job = vec!["JavaScript".to_string(), "Node.js".to_string()];
        let candidate = vec!["JavaScript".to_string(), "React".to_string()];
        let (matched, missing) = partition_skills(&job, &candidate, 0.8);
        assert_eq!(matched, vec!["JavaScript"]);
        assert_eq!(missing, vec!["Node.js"]);
    }

    #[test]
    fn test_contains_term_respects_boundaries() {
        assert!(contains_term("we use java daily", "Java"));
        assert!(!contains_term("we use javascript daily", "Java"));
        assert!(contains_term("strong c# and c++ skills", "C#"));
        assert!(contains_term("strong c# and c++ skills", "C++"));
        assert!(contains_term("backend in node.js.", "Node.js"));
        assert!(!contains_term("nosql stores", "SQL"));
        assert!(contains_term("sql, python", "SQL"));
    }

    #[test]
    fn test_extract_vocabulary_skills() {
        let skills = extract_vocabulary_skills(
            "We need JavaScript and Node.js, plus some Docker. Kubernetes is a bonus.",
            &vocabulary(),
        );
        assert_eq!(skills, vec!["JavaScript", "Node.js", "Docker", "Kubernetes"]);
    }
}
