use crate::JobPosting;

/// Interest alignment in [0.0, 1.0]: the fraction of interest keywords
/// that appear (case-insensitive) in the job's title, description and
/// organization. No interests on file scores neutral.
pub fn score_interest(interests: &[String], job: &JobPosting) -> f64 {
    if interests.is_empty() {
        return 0.5;
    }

    let job_text = format!(
        "{} {} {}",
        job.title,
        job.description.as_deref().unwrap_or(""),
        job.organization.as_deref().unwrap_or("")
    )
    .to_lowercase();

    let matched = interests
        .iter()
        .filter(|interest| {
            let interest = interest.trim().to_lowercase();
            !interest.is_empty() && job_text.contains(&interest)
        })
        .count();

    (matched as f64 / interests.len() as f64).min(1.0)
}
