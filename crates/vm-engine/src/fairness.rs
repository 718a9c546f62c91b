use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AssignmentRecord;

/// One candidate volunteer for a job, as produced by the match scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub volunteer_id: String,
    pub total_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FairnessPriority {
    High,
    Normal,
}

/// A candidate after diversity scoring and quota partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedCandidate {
    pub volunteer_id: String,
    pub total_score: f64,
    pub diversity_score: f64,
    pub penalized: bool,
    pub boosted: bool,
    pub is_new_volunteer: bool,
    pub fairness_priority: FairnessPriority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairnessMetrics {
    pub total_candidates: usize,
    pub new_volunteers: usize,
    pub experienced_volunteers: usize,
    pub new_volunteer_percentage: f64,
    pub average_diversity_score: f64,
    pub fairness_applied: bool,
}

#[derive(Debug, Clone)]
pub struct FairnessConfig {
    /// Lookback for diversity scoring.
    pub diversity_lookback_days: i64,
    /// Lookback that marks a volunteer as "experienced".
    pub recent_lookback_days: i64,
    /// Assignments above this count draw the penalty.
    pub overassignment_threshold: usize,
    pub penalty_factor: f64,
    pub boost_factor: f64,
    /// Share of ranked slots reserved for volunteers without recent
    /// assignments.
    pub new_volunteer_share: f64,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            diversity_lookback_days: 180,
            recent_lookback_days: 30,
            overassignment_threshold: 3,
            penalty_factor: 0.8,
            boost_factor: 1.1,
            new_volunteer_share: 0.7,
        }
    }
}

/// Stateless per-request re-ranker. Consumes a fresh history snapshot each
/// call and never writes it; recording assignments is a separate explicit
/// operation.
pub struct FairnessReranker {
    config: FairnessConfig,
}

impl FairnessReranker {
    pub fn new(config: FairnessConfig) -> Self {
        Self { config }
    }

    /// Re-rank candidates for a job using the caller's history snapshot,
    /// evaluated at `Utc::now()`.
    pub fn apply(
        &self,
        job_id: &str,
        candidates: Vec<CandidateMatch>,
        history: &[AssignmentRecord],
    ) -> (Vec<AdjustedCandidate>, FairnessMetrics) {
        self.apply_at(job_id, candidates, history, Utc::now())
    }

    /// Same as `apply` with an explicit evaluation instant.
    pub fn apply_at(
        &self,
        job_id: &str,
        candidates: Vec<CandidateMatch>,
        history: &[AssignmentRecord],
        now: DateTime<Utc>,
    ) -> (Vec<AdjustedCandidate>, FairnessMetrics) {
        if candidates.is_empty() {
            return (Vec::new(), FairnessMetrics::default());
        }

        let scored = self.diversity_scoring(candidates, history, now);
        let recently_assigned = self.recently_assigned(history, now);
        let retained = self.quota_partition(scored, &recently_assigned);
        let metrics = self.metrics(&retained);

        info!(
            job_id,
            total = metrics.total_candidates,
            new_volunteers = metrics.new_volunteers,
            experienced = metrics.experienced_volunteers,
            "applied fairness re-ranking"
        );

        (retained, metrics)
    }

    /// Boost or penalize by recent-assignment frequency. Scores mutate
    /// exactly once per call; the diversity score itself is derived purely
    /// from the history snapshot, so re-running on the same history is
    /// idempotent.
    fn diversity_scoring(
        &self,
        candidates: Vec<CandidateMatch>,
        history: &[AssignmentRecord],
        now: DateTime<Utc>,
    ) -> Vec<AdjustedCandidate> {
        let cutoff = now - Duration::days(self.config.diversity_lookback_days);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in history {
            if record.assigned_date >= cutoff {
                *counts.entry(record.volunteer_id.as_str()).or_insert(0) += 1;
            }
        }

        candidates
            .into_iter()
            .map(|candidate| {
                let recent = counts.get(candidate.volunteer_id.as_str()).copied().unwrap_or(0);
                let mut total_score = candidate.total_score;
                let mut penalized = false;
                let mut boosted = false;

                if recent > self.config.overassignment_threshold {
                    total_score *= self.config.penalty_factor;
                    penalized = true;
                } else if recent == 0 {
                    total_score *= self.config.boost_factor;
                    boosted = true;
                }

                AdjustedCandidate {
                    volunteer_id: candidate.volunteer_id,
                    total_score,
                    diversity_score: (1.0 - 0.1 * recent as f64).max(0.0),
                    penalized,
                    boosted,
                    // Filled in by the quota partition step.
                    is_new_volunteer: false,
                    fairness_priority: FairnessPriority::Normal,
                }
            })
            .collect()
    }

    fn recently_assigned(
        &self,
        history: &[AssignmentRecord],
        now: DateTime<Utc>,
    ) -> HashSet<String> {
        let cutoff = now - Duration::days(self.config.recent_lookback_days);
        history
            .iter()
            .filter(|record| record.assigned_date >= cutoff)
            .map(|record| record.volunteer_id.clone())
            .collect()
    }

    /// Reserve `floor(share * N)` slots for volunteers without recent
    /// assignments, then fill the remaining capacity with experienced
    /// candidates. The two sublists are concatenated, not re-sorted: new
    /// volunteers are prioritized as a block even when a displaced
    /// experienced candidate scores higher.
    fn quota_partition(
        &self,
        candidates: Vec<AdjustedCandidate>,
        recently_assigned: &HashSet<String>,
    ) -> Vec<AdjustedCandidate> {
        let total = candidates.len();

        let (mut new_volunteers, mut experienced): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| !recently_assigned.contains(&c.volunteer_id));

        let by_score_desc = |a: &AdjustedCandidate, b: &AdjustedCandidate| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        new_volunteers.sort_by(by_score_desc);
        experienced.sort_by(by_score_desc);

        let new_slots = (total as f64 * self.config.new_volunteer_share).floor() as usize;
        let mut new_take = new_slots.min(new_volunteers.len());
        let experienced_take = (total - new_take).min(experienced.len());
        // Unused experienced capacity flows back to new volunteers so the
        // output stays at N whenever N candidates exist.
        new_take = (total - experienced_take).min(new_volunteers.len());

        new_volunteers.truncate(new_take);
        experienced.truncate(experienced_take);

        let mut retained = new_volunteers;
        for candidate in &mut retained {
            candidate.is_new_volunteer = true;
            candidate.fairness_priority = FairnessPriority::High;
        }
        retained.append(&mut experienced);
        retained
    }

    fn metrics(&self, retained: &[AdjustedCandidate]) -> FairnessMetrics {
        if retained.is_empty() {
            return FairnessMetrics::default();
        }

        let total = retained.len();
        let new_volunteers = retained.iter().filter(|c| c.is_new_volunteer).count();
        let mean_diversity =
            retained.iter().map(|c| c.diversity_score).sum::<f64>() / total as f64;

        FairnessMetrics {
            total_candidates: total,
            new_volunteers,
            experienced_volunteers: total - new_volunteers,
            new_volunteer_percentage: new_volunteers as f64 / total as f64 * 100.0,
            average_diversity_score: (mean_diversity * 100.0).round() / 100.0,
            fairness_applied: true,
        }
    }
}

impl Default for FairnessReranker {
    fn default() -> Self {
        Self::new(FairnessConfig::default())
    }
}

/// Build the history row for a confirmed assignment. Pure construction;
/// appending it to the store is the calling layer's job.
pub fn record_assignment(volunteer_id: &str, job_id: &str) -> AssignmentRecord {
    AssignmentRecord {
        volunteer_id: volunteer_id.to_string(),
        job_id: job_id.to_string(),
        assigned_date: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, score: f64) -> CandidateMatch {
        CandidateMatch {
            volunteer_id: id.into(),
            total_score: score,
        }
    }

    fn assignment(volunteer_id: &str, days_ago: i64, now: DateTime<Utc>) -> AssignmentRecord {
        AssignmentRecord {
            volunteer_id: volunteer_id.into(),
            job_id: "job".into(),
            assigned_date: now - Duration::days(days_ago),
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-08-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_input_yields_empty_metrics() {
        let reranker = FairnessReranker::default();
        let (adjusted, metrics) = reranker.apply_at("j1", vec![], &[], now());
        assert!(adjusted.is_empty());
        assert_eq!(metrics, FairnessMetrics::default());
        assert!(!metrics.fairness_applied);
    }

    #[test]
    fn four_recent_assignments_draw_the_penalty() {
        let reranker = FairnessReranker::default();
        let history: Vec<_> = (0..4).map(|i| assignment("v1", 10 + i, now())).collect();

        let (adjusted, _) =
            reranker.apply_at("j1", vec![candidate("v1", 0.9)], &history, now());

        assert_eq!(adjusted.len(), 1);
        assert!(adjusted[0].penalized);
        assert!((adjusted[0].total_score - 0.72).abs() < 1e-9);
        assert!((adjusted[0].diversity_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn three_assignments_are_tolerated() {
        let reranker = FairnessReranker::default();
        let history: Vec<_> = (0..3).map(|i| assignment("v1", 10 + i, now())).collect();

        let (adjusted, _) =
            reranker.apply_at("j1", vec![candidate("v1", 0.9)], &history, now());

        assert!(!adjusted[0].penalized);
        assert!(!adjusted[0].boosted);
        assert!((adjusted[0].total_score - 0.9).abs() < 1e-9);
        assert!((adjusted[0].diversity_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn unassigned_volunteers_get_the_boost() {
        let reranker = FairnessReranker::default();
        let (adjusted, _) = reranker.apply_at("j1", vec![candidate("v1", 0.5)], &[], now());

        assert!(adjusted[0].boosted);
        assert!((adjusted[0].total_score - 0.55).abs() < 1e-9);
        assert_eq!(adjusted[0].diversity_score, 1.0);
    }

    #[test]
    fn assignments_outside_lookback_are_ignored() {
        let reranker = FairnessReranker::default();
        let history = vec![
            assignment("v1", 181, now()),
            assignment("v1", 365, now()),
        ];

        let (adjusted, _) =
            reranker.apply_at("j1", vec![candidate("v1", 0.5)], &history, now());

        // Nothing inside 180 days: treated as never assigned.
        assert!(adjusted[0].boosted);
        assert_eq!(adjusted[0].diversity_score, 1.0);
    }

    #[test]
    fn diversity_scoring_is_idempotent_per_history() {
        let reranker = FairnessReranker::default();
        let history: Vec<_> = (0..4).map(|i| assignment("v1", 10 + i, now())).collect();
        let candidates = vec![candidate("v1", 0.9)];

        let (first, _) = reranker.apply_at("j1", candidates.clone(), &history, now());
        let (second, _) = reranker.apply_at("j1", candidates, &history, now());

        // Same snapshot in, same scores out; the penalty never compounds.
        assert_eq!(first, second);
    }

    #[test]
    fn quota_reserves_seventy_percent_for_new_volunteers() {
        let reranker = FairnessReranker::default();
        // v8, v9, v10 were assigned within 30 days; the rest are new.
        let history: Vec<_> = ["v8", "v9", "v10"]
            .iter()
            .map(|id| assignment(id, 5, now()))
            .collect();
        let candidates: Vec<_> = (1..=10)
            .map(|i| candidate(&format!("v{i}"), 1.0 - i as f64 * 0.05))
            .collect();

        let (adjusted, metrics) = reranker.apply_at("j1", candidates, &history, now());

        assert_eq!(adjusted.len(), 10);
        assert_eq!(metrics.new_volunteers, 7);
        assert_eq!(metrics.experienced_volunteers, 3);
        assert!((metrics.new_volunteer_percentage - 70.0).abs() < 1e-9);
        // New volunteers come first as a block.
        assert!(adjusted[..7].iter().all(|c| c.is_new_volunteer));
        assert!(adjusted[7..].iter().all(|c| !c.is_new_volunteer));
        assert!(adjusted[..7]
            .iter()
            .all(|c| c.fairness_priority == FairnessPriority::High));
    }

    #[test]
    fn scarce_new_volunteers_fill_remainder_with_experienced() {
        let reranker = FairnessReranker::default();
        // Only v1 and v2 are new; the other eight are experienced.
        let history: Vec<_> = (3..=10)
            .map(|i| assignment(&format!("v{i}"), 5, now()))
            .collect();
        let candidates: Vec<_> = (1..=10)
            .map(|i| candidate(&format!("v{i}"), 1.0 - i as f64 * 0.05))
            .collect();

        let (adjusted, metrics) = reranker.apply_at("j1", candidates, &history, now());

        // All available new volunteers retained, remainder filled up to N.
        assert_eq!(adjusted.len(), 10);
        assert_eq!(metrics.new_volunteers, 2);
        assert_eq!(metrics.experienced_volunteers, 8);
    }

    #[test]
    fn new_block_outranks_higher_scoring_excluded_experienced() {
        let reranker = FairnessReranker::default();
        let history: Vec<_> = ["e1", "e2"]
            .iter()
            .map(|id| assignment(id, 5, now()))
            .collect();
        // Experienced candidates score far above the new ones.
        let candidates = vec![
            candidate("e1", 0.95),
            candidate("e2", 0.90),
            candidate("n1", 0.30),
            candidate("n2", 0.20),
        ];

        let (adjusted, _) = reranker.apply_at("j1", candidates, &history, now());

        // floor(0.7 * 4) = 2 new slots, 2 experienced slots.
        let order: Vec<_> = adjusted.iter().map(|c| c.volunteer_id.as_str()).collect();
        assert_eq!(order, vec!["n1", "n2", "e1", "e2"]);
    }

    #[test]
    fn metrics_round_mean_diversity_to_two_decimals() {
        let reranker = FairnessReranker::default();
        let history = vec![assignment("v1", 10, now())];
        let candidates = vec![candidate("v1", 0.8), candidate("v2", 0.6), candidate("v3", 0.4)];

        let (_, metrics) = reranker.apply_at("j1", candidates, &history, now());

        // Diversity scores: 0.9, 1.0, 1.0 → mean 0.966... → 0.97.
        assert!((metrics.average_diversity_score - 0.97).abs() < 1e-9);
        assert!(metrics.fairness_applied);
    }

    #[test]
    fn record_assignment_is_pure_construction() {
        let record = record_assignment("v1", "j1");
        assert_eq!(record.volunteer_id, "v1");
        assert_eq!(record.job_id, "j1");
        assert!(record.assigned_date <= Utc::now());
    }
}
