use std::collections::HashSet;

use tracing::warn;

use crate::similarity::TextSimilarity;
use crate::text::normalize_keyword;

/// Weight of the semantic similarity component; the exact-match ratio gets
/// the complement. Overridable for experiments via env.
fn semantic_weight() -> f64 {
    std::env::var("VM_SKILL_SEMANTIC_WEIGHT")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|w| (0.0..=1.0).contains(w))
        .unwrap_or(0.7)
}

/// Skill compatibility in [0.0, 1.0].
///
/// Edge policy: a job with no skill requirements is generously matchable
/// (0.8); a volunteer with no skills against a job that requires some is
/// scored low but never excluded outright (0.2). The semantic path runs
/// when a similarity backend is present; any backend error degrades
/// silently to the lexical fallback.
pub fn score_skills(
    volunteer_skills: &[String],
    required_skills: &[String],
    similarity: Option<&dyn TextSimilarity>,
) -> f64 {
    if required_skills.is_empty() {
        return 0.8;
    }
    if volunteer_skills.is_empty() {
        return 0.2;
    }

    if let Some(backend) = similarity {
        let volunteer_text = volunteer_skills.join(" ");
        let required_text = required_skills.join(" ");
        match backend.similarity(&volunteer_text, &required_text) {
            Ok(semantic) => {
                let weight = semantic_weight();
                let exact = exact_match_ratio(volunteer_skills, required_skills);
                return (semantic * weight + exact * (1.0 - weight)).min(1.0);
            }
            Err(err) => {
                warn!(
                    backend = backend.name(),
                    error = %err,
                    "similarity backend failed; using lexical fallback"
                );
            }
        }
    }

    fallback_score(volunteer_skills, required_skills)
}

/// Share of required skills present verbatim (case-insensitive) in the
/// volunteer's skill set.
fn exact_match_ratio(volunteer_skills: &[String], required_skills: &[String]) -> f64 {
    let volunteer: HashSet<String> = volunteer_skills
        .iter()
        .map(|s| normalize_keyword(s))
        .collect();
    let matched = required_skills
        .iter()
        .filter(|s| volunteer.contains(&normalize_keyword(s)))
        .count();
    matched as f64 / required_skills.len() as f64
}

/// Deterministic lexical fallback: a required skill matches when it is a
/// substring of, a superstring of, or shares any whitespace token with,
/// any volunteer skill name.
pub fn fallback_score(volunteer_skills: &[String], required_skills: &[String]) -> f64 {
    let volunteer: Vec<String> = volunteer_skills
        .iter()
        .map(|s| normalize_keyword(s))
        .collect();

    let matched = required_skills
        .iter()
        .map(|s| normalize_keyword(s))
        .filter(|required| volunteer.iter().any(|owned| skills_overlap(required, owned)))
        .count();

    (matched as f64 / required_skills.len() as f64).min(1.0)
}

fn skills_overlap(required: &str, owned: &str) -> bool {
    owned.contains(required)
        || required.contains(owned)
        || required.split_whitespace().any(|word| owned.contains(word))
        || owned.split_whitespace().any(|word| required.contains(word))
}
