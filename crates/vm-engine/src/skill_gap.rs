use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::normalize_keyword;
use crate::{JobPosting, VolunteerProfile};

/// A required skill the volunteer lacks, ranked by demand across the
/// job corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub demand: usize,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub total_jobs_analyzed: usize,
    pub total_unique_required_skills: usize,
    pub gaps: Vec<SkillGap>,
}

#[derive(Debug, Clone)]
pub struct SkillGapRecommender {
    top_n: usize,
}

impl Default for SkillGapRecommender {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl SkillGapRecommender {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Aggregate unmet required-skill demand across the corpus. Gaps are
    /// sorted by descending demand, then ascending skill name; an empty or
    /// skill-less corpus yields an empty report, never an error.
    pub fn recommend(&self, volunteer: &VolunteerProfile, jobs: &[JobPosting]) -> SkillGapReport {
        let owned: HashSet<String> = volunteer
            .skills
            .iter()
            .map(|skill| normalize_keyword(&skill.name))
            .filter(|name| !name.is_empty())
            .collect();

        let mut demand: HashMap<String, usize> = HashMap::new();
        for job in jobs {
            for skill in &job.skills_required {
                let normalized = normalize_keyword(skill);
                if normalized.is_empty() {
                    continue;
                }
                *demand.entry(normalized).or_insert(0) += 1;
            }
        }

        let total_unique_required_skills = demand.len();

        let mut gaps: Vec<SkillGap> = demand
            .into_iter()
            .filter(|(skill, _)| !owned.contains(skill))
            .map(|(skill, demand)| SkillGap {
                suggestion: format!("Improve '{skill}' via a short course or practice project"),
                skill,
                demand,
            })
            .collect();

        gaps.sort_by(|a, b| b.demand.cmp(&a.demand).then_with(|| a.skill.cmp(&b.skill)));
        gaps.truncate(self.top_n);

        debug!(
            volunteer_id = %volunteer.volunteer_id,
            jobs = jobs.len(),
            gaps = gaps.len(),
            "computed skill gaps"
        );

        SkillGapReport {
            total_jobs_analyzed: jobs.len(),
            total_unique_required_skills,
            gaps,
        }
    }
}
