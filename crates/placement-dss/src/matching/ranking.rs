use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::info;

use super::domain::{InternshipProfile, StudentProfile};
use super::engine::{MatchScore, ScoringEngine};
use super::error::DssError;
use super::weights::NormalizedWeights;
use crate::config::DEFAULT_PARALLEL_THRESHOLD;

/// Cooperative cancellation checked between candidate evaluations.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Batch scoring plus deterministic ordering of the results.
#[derive(Debug, Clone)]
pub struct RankingService {
    engine: ScoringEngine,
    parallel_threshold: usize,
}

impl RankingService {
    pub fn new(engine: ScoringEngine) -> Self {
        Self::with_parallel_threshold(engine, DEFAULT_PARALLEL_THRESHOLD)
    }

    pub fn with_parallel_threshold(engine: ScoringEngine, parallel_threshold: usize) -> Self {
        Self {
            engine,
            parallel_threshold: parallel_threshold.max(1),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Rank internships for one student, best fit first.
    pub fn rank(
        &self,
        student: &StudentProfile,
        candidates: &[InternshipProfile],
        weights: &NormalizedWeights,
        top_k: Option<usize>,
    ) -> Result<Vec<MatchScore>, DssError> {
        self.rank_with_cancel(student, candidates, weights, top_k, &CancelFlag::default())
    }

    pub fn rank_with_cancel(
        &self,
        student: &StudentProfile,
        candidates: &[InternshipProfile],
        weights: &NormalizedWeights,
        top_k: Option<usize>,
        cancel: &CancelFlag,
    ) -> Result<Vec<MatchScore>, DssError> {
        if candidates.is_empty() {
            return Err(DssError::EmptyCandidateSet);
        }
        weights.ensure_not_empty()?;

        let scored = self.evaluate_all(candidates, cancel, |internship| {
            self.engine.score(student, internship, weights)
        })?;
        let ranked = order(scored, top_k, |internship| {
            (internship.created_at, internship.id.0)
        });

        info!(
            student = %student.id,
            candidates = candidates.len(),
            returned = ranked.len(),
            "ranked internships for student"
        );
        Ok(ranked)
    }

    /// Rank applicants for one internship, best fit first.
    pub fn rank_students(
        &self,
        internship: &InternshipProfile,
        candidates: &[StudentProfile],
        weights: &NormalizedWeights,
        top_k: Option<usize>,
    ) -> Result<Vec<MatchScore>, DssError> {
        self.rank_students_with_cancel(
            internship,
            candidates,
            weights,
            top_k,
            &CancelFlag::default(),
        )
    }

    pub fn rank_students_with_cancel(
        &self,
        internship: &InternshipProfile,
        candidates: &[StudentProfile],
        weights: &NormalizedWeights,
        top_k: Option<usize>,
        cancel: &CancelFlag,
    ) -> Result<Vec<MatchScore>, DssError> {
        if candidates.is_empty() {
            return Err(DssError::EmptyCandidateSet);
        }
        weights.ensure_not_empty()?;

        let scored = self.evaluate_all(candidates, cancel, |student| {
            self.engine.score(student, internship, weights)
        })?;
        let ranked = order(scored, top_k, |student| (student.created_at, student.id.0));

        info!(
            internship = %internship.id,
            candidates = candidates.len(),
            returned = ranked.len(),
            "ranked students for internship"
        );
        Ok(ranked)
    }

    fn evaluate_all<'a, C, F>(
        &self,
        candidates: &'a [C],
        cancel: &CancelFlag,
        score: F,
    ) -> Result<Vec<(&'a C, MatchScore)>, DssError>
    where
        C: Sync,
        F: Fn(&C) -> Result<MatchScore, DssError> + Sync,
    {
        let evaluate = |candidate: &'a C| {
            if cancel.is_cancelled() {
                return Err(DssError::Cancelled);
            }
            score(candidate).map(|result| (candidate, result))
        };

        if candidates.len() >= self.parallel_threshold {
            candidates.par_iter().map(evaluate).collect()
        } else {
            candidates.iter().map(evaluate).collect()
        }
    }
}

/// Sort by score descending, then by the candidate's age and identifier, then truncate.
fn order<C, K>(
    mut scored: Vec<(&C, MatchScore)>,
    top_k: Option<usize>,
    tie_key: K,
) -> Vec<MatchScore>
where
    K: Fn(&C) -> (DateTime<Utc>, u64),
{
    scored.sort_by(|(left, left_score), (right, right_score)| {
        match right_score.score.total_cmp(&left_score.score) {
            CmpOrdering::Equal => tie_key(*left).cmp(&tie_key(*right)),
            other => other,
        }
    });

    let mut ranked: Vec<MatchScore> = scored.into_iter().map(|(_, score)| score).collect();
    if let Some(limit) = top_k {
        ranked.truncate(limit);
    }
    ranked
}
