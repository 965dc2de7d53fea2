// src/matching/location.rs
use crate::types::RemoteWork;

/// Cities and names that identify a country well enough for a rough comparison
const COUNTRY_HINTS: &[(&str, &[&str])] = &[
    (
        "france",
        &[
            "france", "paris", "lyon", "marseille", "toulouse", "lille", "bordeaux", "nantes",
            "nice", "strasbourg",
        ],
    ),
    (
        "uk",
        &[
            "united kingdom", "uk", "england", "london", "manchester", "birmingham", "edinburgh",
            "bristol",
        ],
    ),
    (
        "germany",
        &["germany", "deutschland", "berlin", "munich", "münchen", "hamburg", "frankfurt"],
    ),
    ("spain", &["spain", "españa", "madrid", "barcelona", "valencia", "sevilla"]),
    ("italy", &["italy", "italia", "rome", "roma", "milan", "milano", "turin"]),
    ("netherlands", &["netherlands", "amsterdam", "rotterdam", "utrecht", "eindhoven"]),
    (
        "morocco",
        &[
            "morocco", "maroc", "casablanca", "rabat", "marrakech", "tanger", "tangier", "fès",
            "fes", "agadir",
        ],
    ),
    ("tunisia", &["tunisia", "tunisie", "tunis", "sfax", "sousse"]),
    ("algeria", &["algeria", "algérie", "alger", "algiers", "oran", "constantine"]),
    ("senegal", &["senegal", "sénégal", "dakar", "thiès"]),
    (
        "cotedivoire",
        &["côte d'ivoire", "cote d'ivoire", "ivory coast", "abidjan", "yamoussoukro"],
    ),
    (
        "southafrica",
        &["south africa", "johannesburg", "cape town", "durban", "pretoria"],
    ),
];

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whole-word phrase match, so "uk" does not fire inside "duluth"
fn has_phrase(haystack: &[&str], needle: &str) -> bool {
    let target = words(needle);
    !target.is_empty() && haystack.windows(target.len()).any(|w| w == target.as_slice())
}

pub fn infer_country(location: &str) -> Option<&'static str> {
    let lower = location.to_lowercase();
    let tokens = words(&lower);
    COUNTRY_HINTS
        .iter()
        .find(|(_, hints)| hints.iter().any(|hint| has_phrase(&tokens, hint)))
        .map(|(country, _)| *country)
}

pub fn location_match(
    candidate_location: Option<&str>,
    job_location: &str,
    remote: RemoteWork,
) -> f64 {
    let candidate = candidate_location.map(str::trim).unwrap_or_default();
    let job = job_location.trim();
    if candidate.is_empty() || job.is_empty() {
        return 0.5;
    }

    let candidate_lower = candidate.to_lowercase();
    let job_lower = job.to_lowercase();
    if job_lower.contains(&candidate_lower) || candidate_lower.contains(&job_lower) {
        return 1.0;
    }

    match remote {
        RemoteWork::Full => return 0.9,
        RemoteWork::Hybrid => return 0.7,
        RemoteWork::No => {}
    }

    match (infer_country(candidate), infer_country(job)) {
        (Some(a), Some(b)) if a == b => 0.6,
        _ => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_country() {
        assert_eq!(infer_country("Paris, Île-de-France"), Some("france"));
        assert_eq!(infer_country("Casablanca"), Some("morocco"));
        assert_eq!(infer_country("Cape Town, Western Cape"), Some("southafrica"));
        assert_eq!(infer_country("London"), Some("uk"));
        assert_eq!(infer_country("Duluth"), None);
    }

    #[test]
    fn test_location_tiers() {
        assert_eq!(location_match(Some("Lyon"), "Lyon 3e", RemoteWork::No), 1.0);
        assert_eq!(location_match(Some("Lyon"), "Berlin", RemoteWork::Full), 0.9);
        assert_eq!(location_match(Some("Lyon"), "Berlin", RemoteWork::Hybrid), 0.7);
        assert_eq!(location_match(Some("Lyon"), "Paris", RemoteWork::No), 0.6);
        assert_eq!(location_match(Some("Lyon"), "Berlin", RemoteWork::No), 0.2);
        assert_eq!(location_match(None, "Berlin", RemoteWork::No), 0.5);
        assert_eq!(location_match(Some("Lyon"), "  ", RemoteWork::Full), 0.5);
    }
}
