use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::CriterionRegistry;
use super::domain::{InternshipId, InternshipProfile, StudentId, StudentProfile};
use super::error::DssError;
use super::weights::NormalizedWeights;

/// Round a weighted fraction to a percentage with two decimals, ties to even.
pub fn round_score(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Contribution of one criterion to a match score. Values are kept unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDetail {
    pub criterion: String,
    pub subscore: f64,
    /// Normalized weight applied to the sub-score.
    pub weight: f64,
    pub contribution: f64,
}

/// Fit of one student/internship pair (persisted as a `dss_scores` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub student_id: StudentId,
    pub internship_id: InternshipId,
    pub score: f64,
    pub details: Vec<CriterionDetail>,
}

impl MatchScore {
    /// Rebuild the rounded score from `details` in their reported order.
    pub fn recompute(&self) -> f64 {
        let raw = self
            .details
            .iter()
            .fold(0.0, |total, detail| total + detail.contribution);
        round_score(raw)
    }

    pub fn is_consistent(&self) -> bool {
        self.recompute() == self.score
    }

    pub fn detail(&self, criterion: &str) -> Option<&CriterionDetail> {
        self.details
            .iter()
            .find(|detail| detail.criterion == criterion)
    }
}

/// Stateless evaluator combining registered criteria with normalized weights.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    registry: Arc<CriterionRegistry>,
}

impl ScoringEngine {
    pub fn new(registry: Arc<CriterionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    pub fn score(
        &self,
        student: &StudentProfile,
        internship: &InternshipProfile,
        weights: &NormalizedWeights,
    ) -> Result<MatchScore, DssError> {
        weights.ensure_not_empty()?;

        let mut plan = Vec::with_capacity(weights.len());
        for (criterion, weight) in weights.iter() {
            let position = self
                .registry
                .position(criterion)
                .ok_or_else(|| DssError::UnknownCriterion(criterion.to_string()))?;
            plan.push((position, criterion, weight));
        }
        plan.sort_by_key(|(position, _, _)| *position);

        let mut raw = 0.0;
        let mut details = Vec::with_capacity(plan.len());
        for (_, criterion, weight) in plan {
            let subscore = self.registry.evaluate(criterion, student, internship)?;
            let contribution = weight * subscore;
            raw += contribution;
            details.push(CriterionDetail {
                criterion: criterion.to_string(),
                subscore,
                weight,
                contribution,
            });
        }

        let score = round_score(raw);
        debug!(
            student = %student.id,
            internship = %internship.id,
            score,
            "scored candidate pair"
        );

        Ok(MatchScore {
            student_id: student.id,
            internship_id: internship.id,
            score,
            details,
        })
    }
}
