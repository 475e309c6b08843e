//! Decision support matching: weighted multi-criteria scoring of student/internship pairs.
//!
//! Criteria are pure functions held in a [`CriterionRegistry`]. Administrator weight rows are
//! validated and normalized into [`NormalizedWeights`], which the [`ScoringEngine`] combines
//! with criterion sub-scores into a [`MatchScore`]. The [`RankingService`] scores candidate
//! sets and orders them deterministically; persistence is delegated to a [`ScoreStore`]
//! supplied by the surrounding application.

pub mod criteria;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ranking;
pub mod router;
pub mod service;
pub mod store;
pub mod weights;

#[cfg(test)]
mod tests;

pub use criteria::{CriteriaConfig, CriterionFn, CriterionRegistry, FieldAffinity};
pub use domain::{InternshipId, InternshipProfile, StudentId, StudentProfile};
pub use engine::{round_score, CriterionDetail, MatchScore, ScoringEngine};
pub use error::DssError;
pub use ranking::{CancelFlag, RankingService};
pub use router::{match_router, InternshipMatchRequest, StudentMatchRequest};
pub use service::{MatchService, MatchServiceError, RankedMatches};
pub use store::{ScoreStore, StoreError};
pub use weights::{NormalizedWeights, Weight};
