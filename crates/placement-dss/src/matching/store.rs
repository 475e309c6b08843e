use super::domain::{InternshipId, StudentId};
use super::engine::MatchScore;

/// Persistence capability for match score snapshots, implemented by the CRUD layer.
///
/// `save` is idempotent per (student, internship) pair: the last write wins. Retention of
/// older snapshots is up to the implementation.
pub trait ScoreStore: Send + Sync {
    fn save(&self, score: &MatchScore) -> Result<(), StoreError>;
    fn load_latest(
        &self,
        student_id: StudentId,
        internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store unavailable: {0}")]
    Unavailable(String),
    #[error("score store rejected snapshot: {0}")]
    Rejected(String),
}
