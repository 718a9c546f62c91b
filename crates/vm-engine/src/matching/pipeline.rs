use rayon::prelude::*;
use tracing::info;

use super::scoring::{calculate_match_score, MatchResult};
use crate::fairness::{
    self, AdjustedCandidate, CandidateMatch, FairnessConfig, FairnessMetrics, FairnessReranker,
};
use crate::similarity::{init_similarity_from_env, TextSimilarity};
use crate::skill_gap::{SkillGapRecommender, SkillGapReport};
use crate::{AssignmentRecord, JobPosting, VolunteerProfile};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ranked list length cap.
    pub top_k: usize,
    /// Matches at or below this total score are discarded.
    pub score_floor: f64,
    pub fairness: FairnessConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            score_floor: 0.1,
            fairness: FairnessConfig::default(),
        }
    }
}

/// Facade over the scoring pipeline, fairness re-ranker and skill-gap
/// recommender. Holds no request state; the similarity backend is chosen
/// once at construction and absence routes the skill scorer onto its
/// lexical fallback.
pub struct MatchingEngine {
    config: EngineConfig,
    similarity: Option<Box<dyn TextSimilarity>>,
    reranker: FairnessReranker,
    recommender: SkillGapRecommender,
}

impl MatchingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let fairness = config.fairness.clone();
        Self {
            config,
            similarity: init_similarity_from_env(),
            reranker: FairnessReranker::new(fairness),
            recommender: SkillGapRecommender::default(),
        }
    }

    pub fn with_similarity(
        config: EngineConfig,
        similarity: Option<Box<dyn TextSimilarity>>,
    ) -> Self {
        let fairness = config.fairness.clone();
        Self {
            config,
            similarity,
            reranker: FairnessReranker::new(fairness),
            recommender: SkillGapRecommender::default(),
        }
    }

    /// Score every job in the corpus for one volunteer and return the
    /// top-K matches by total score. Per-job scoring is pure and fans out
    /// across the rayon pool; the ordered collect keeps ties in stable
    /// input order through the sort.
    pub fn rank_jobs_for_volunteer(
        &self,
        volunteer: &VolunteerProfile,
        jobs: &[JobPosting],
    ) -> Vec<MatchResult> {
        let similarity = self.similarity.as_deref();

        let mut ranked: Vec<MatchResult> = jobs
            .par_iter()
            .map(|job| calculate_match_score(volunteer, job, similarity))
            .collect::<Vec<_>>()
            .into_iter()
            .filter(|result| result.total_score > self.config.score_floor)
            .collect();

        ranked.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(self.config.top_k);

        info!(
            volunteer_id = %volunteer.volunteer_id,
            jobs = jobs.len(),
            matches = ranked.len(),
            "ranked job corpus for volunteer"
        );

        ranked
    }

    /// Adjust a candidate list for a job by assignment-history fairness.
    pub fn apply_fairness(
        &self,
        job_id: &str,
        candidates: Vec<CandidateMatch>,
        history: &[AssignmentRecord],
    ) -> (Vec<AdjustedCandidate>, FairnessMetrics) {
        self.reranker.apply(job_id, candidates, history)
    }

    /// Skills the volunteer lacks, ranked by demand across the corpus.
    pub fn recommend_skill_gaps(
        &self,
        volunteer: &VolunteerProfile,
        jobs: &[JobPosting],
    ) -> SkillGapReport {
        self.recommender.recommend(volunteer, jobs)
    }

    /// Build the history row for a confirmed assignment; the caller
    /// persists it.
    pub fn record_assignment(&self, volunteer_id: &str, job_id: &str) -> AssignmentRecord {
        fairness::record_assignment(volunteer_id, job_id)
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
