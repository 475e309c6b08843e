use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::criteria::CriterionRegistry;
use super::domain::{InternshipId, InternshipProfile, StudentId, StudentProfile};
use super::engine::{MatchScore, ScoringEngine};
use super::error::DssError;
use super::ranking::RankingService;
use super::store::{ScoreStore, StoreError};
use super::weights::{NormalizedWeights, Weight};
use crate::config::MatchingConfig;

/// Ranked scores together with the number of snapshots written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatches {
    pub scores: Vec<MatchScore>,
    /// Snapshots written by this run. Only reported on success: when a save fails the run
    /// returns [`MatchServiceError::Persist`], which carries the count saved before the failure.
    pub persisted: usize,
}

/// Service composing weight validation, ranking, and snapshot persistence.
///
/// Every call normalizes the weight rows it is handed; nothing is cached between runs.
pub struct MatchService<S> {
    ranking: Arc<RankingService>,
    store: Arc<S>,
}

impl<S> MatchService<S>
where
    S: ScoreStore + 'static,
{
    pub fn new(store: Arc<S>, config: &MatchingConfig) -> Result<Self, DssError> {
        let registry = Arc::new(CriterionRegistry::with_defaults(&config.criteria())?);
        Ok(Self::with_registry(registry, store, config.parallel_threshold))
    }

    pub fn with_registry(
        registry: Arc<CriterionRegistry>,
        store: Arc<S>,
        parallel_threshold: usize,
    ) -> Self {
        let engine = ScoringEngine::new(registry);
        let ranking = Arc::new(RankingService::with_parallel_threshold(
            engine,
            parallel_threshold,
        ));

        Self { ranking, store }
    }

    pub fn criteria(&self) -> Vec<&str> {
        self.ranking.engine().registry().list_names()
    }

    pub fn normalize(&self, weights: &[Weight]) -> Result<NormalizedWeights, DssError> {
        NormalizedWeights::load(weights, self.ranking.engine().registry())
    }

    /// Rank internships for a student and persist the returned scores.
    pub fn match_internships(
        &self,
        student: &StudentProfile,
        internships: &[InternshipProfile],
        weights: &[Weight],
        top_k: Option<usize>,
    ) -> Result<RankedMatches, MatchServiceError> {
        let normalized = self.normalize(weights)?;
        let scores = self
            .ranking
            .rank(student, internships, &normalized, top_k)?;
        let persisted = self.persist(&scores)?;

        info!(student = %student.id, persisted, "stored internship matches");
        Ok(RankedMatches { scores, persisted })
    }

    /// Rank students for an internship and persist the returned scores.
    pub fn match_students(
        &self,
        internship: &InternshipProfile,
        students: &[StudentProfile],
        weights: &[Weight],
        top_k: Option<usize>,
    ) -> Result<RankedMatches, MatchServiceError> {
        let normalized = self.normalize(weights)?;
        let scores = self
            .ranking
            .rank_students(internship, students, &normalized, top_k)?;
        let persisted = self.persist(&scores)?;

        info!(internship = %internship.id, persisted, "stored applicant matches");
        Ok(RankedMatches { scores, persisted })
    }

    /// Score and persist a single pair.
    pub fn score_pair(
        &self,
        student: &StudentProfile,
        internship: &InternshipProfile,
        weights: &[Weight],
    ) -> Result<MatchScore, MatchServiceError> {
        let normalized = self.normalize(weights)?;
        let score = self
            .ranking
            .engine()
            .score(student, internship, &normalized)?;
        self.store.save(&score)?;
        Ok(score)
    }

    /// Last stored snapshot for a pair, without recomputing.
    pub fn latest(
        &self,
        student_id: StudentId,
        internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, MatchServiceError> {
        Ok(self.store.load_latest(student_id, internship_id)?)
    }

    /// Saves are not transactional: earlier snapshots stay written when a later one fails.
    fn persist(&self, scores: &[MatchScore]) -> Result<usize, MatchServiceError> {
        for (saved, score) in scores.iter().enumerate() {
            self.store
                .save(score)
                .map_err(|source| MatchServiceError::Persist { saved, source })?;
        }
        Ok(scores.len())
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Dss(#[from] DssError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{source} ({saved} snapshots saved before the failure)")]
    Persist { saved: usize, source: StoreError },
}

impl MatchServiceError {
    /// Store failure behind this error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            MatchServiceError::Dss(_) => None,
            MatchServiceError::Store(source) | MatchServiceError::Persist { source, .. } => {
                Some(source)
            }
        }
    }
}
