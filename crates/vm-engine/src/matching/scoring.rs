use serde::{Deserialize, Serialize};

use super::availability::{normalize_availability, AvailabilityFeatures};
use super::weights::MATCH_WEIGHTS;
use super::{interest, location, skills};
use crate::similarity::TextSimilarity;
use crate::{Availability, JobPosting, MonthlyAvailability, PreferredDays, VolunteerProfile};

/// Per-pair match outcome. Ephemeral: computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: String,
    pub total_score: f64,
    pub skill_score: f64,
    pub location_score: f64,
    pub availability_score: f64,
    pub interest_score: f64,
    pub reasons: Vec<String>,
}

/// Compute the four weighted sub-scores and the total for one
/// (volunteer, job) pair. Pure: no I/O, total always in [0.0, 1.0].
pub fn calculate_match_score(
    volunteer: &VolunteerProfile,
    job: &JobPosting,
    similarity: Option<&dyn TextSimilarity>,
) -> MatchResult {
    let skill_score = skills::score_skills(
        &volunteer.skill_names(),
        &job.skills_required,
        similarity,
    );
    let location_score =
        location::score_location(volunteer.location.as_deref(), job.location.as_deref());
    let availability_score = score_availability(volunteer.availability.as_ref(), job);
    let interest_score = interest::score_interest(&volunteer.interests, job);

    let total_score = (skill_score * MATCH_WEIGHTS.skill
        + location_score * MATCH_WEIGHTS.location
        + availability_score * MATCH_WEIGHTS.availability
        + interest_score * MATCH_WEIGHTS.interest)
        .clamp(0.0, 1.0);

    MatchResult {
        job_id: job.job_id.clone(),
        total_score,
        skill_score,
        location_score,
        availability_score,
        interest_score,
        reasons: match_reasons(skill_score, location_score, availability_score, interest_score),
    }
}

/// How a job's free-text `time_commitment` tag reads, checked in a fixed
/// order so mixed tags resolve deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitmentHint {
    PartTime,
    FullTime,
    Weekend,
    Unspecified,
}

fn commitment_hint(time_commitment: Option<&str>) -> CommitmentHint {
    let tag = time_commitment.unwrap_or("").to_lowercase();
    if tag.contains("part-time") || tag.contains("flexible") {
        CommitmentHint::PartTime
    } else if tag.contains("full-time") {
        CommitmentHint::FullTime
    } else if tag.contains("weekend") {
        CommitmentHint::Weekend
    } else {
        CommitmentHint::Unspecified
    }
}

/// Availability sub-score against the job's time commitment.
fn score_availability(availability: Option<&Availability>, job: &JobPosting) -> f64 {
    match availability {
        Some(Availability::Monthly(monthly)) => score_monthly(monthly, job),
        _ => {
            let features = normalize_availability(availability);
            if !features.specified {
                return 0.6;
            }
            score_weekly(&features, job)
        }
    }
}

fn score_weekly(features: &AvailabilityFeatures, job: &JobPosting) -> f64 {
    let day_score = (features.available_day_count as f64 / 7.0).min(1.0);
    let base = day_score * 0.7;

    let bonus = match commitment_hint(job.time_commitment.as_deref()) {
        CommitmentHint::PartTime if features.available_day_count >= 2 => 0.2,
        CommitmentHint::FullTime if features.available_day_count >= 5 => 0.3,
        CommitmentHint::Weekend if features.has_weekend_availability => 0.4,
        _ => 0.0,
    };

    (base + bonus).min(1.0).max(0.1)
}

fn score_monthly(monthly: &MonthlyAvailability, job: &JobPosting) -> f64 {
    let hours = monthly.hours_per_week.unwrap_or(10.0);

    let base: f64 = if hours >= 20.0 {
        1.0
    } else if hours >= 15.0 {
        0.9
    } else if hours >= 10.0 {
        0.8
    } else if hours >= 5.0 {
        0.6
    } else {
        0.4
    };

    let hint = commitment_hint(job.time_commitment.as_deref());
    let bonus = if hint == CommitmentHint::PartTime && hours <= 15.0 {
        0.1
    } else if hint == CommitmentHint::FullTime && hours >= 20.0 {
        0.1
    } else if hint == CommitmentHint::Weekend && monthly.preferred_days == PreferredDays::Weekends {
        0.2
    } else if monthly.preferred_days == PreferredDays::Flexible {
        0.1
    } else {
        0.0
    };

    (base + bonus).min(1.0)
}

/// Fixed thresholds over the sub-scores produce the human-readable tags
/// surfaced alongside each match.
fn match_reasons(
    skill_score: f64,
    location_score: f64,
    availability_score: f64,
    interest_score: f64,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if skill_score > 0.5 {
        reasons.push("Good skill match".to_string());
    } else if skill_score > 0.2 {
        reasons.push("Some relevant skills".to_string());
    }

    if location_score > 0.6 {
        reasons.push("Good location match".to_string());
    } else if location_score > 0.4 {
        reasons.push("Acceptable location".to_string());
    }

    if availability_score > 0.5 {
        reasons.push("Good availability".to_string());
    }

    if interest_score > 0.4 {
        reasons.push("Interest alignment".to_string());
    }

    if reasons.is_empty() {
        reasons.push("General volunteer opportunity".to_string());
    }

    reasons
}
