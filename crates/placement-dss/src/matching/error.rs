/// Failures surfaced by the matching core. Each variant maps to a distinct API response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DssError {
    #[error("criterion '{0}' is already registered")]
    DuplicateCriterion(String),
    #[error("criterion '{0}' is not registered")]
    UnknownCriterion(String),
    #[error("invalid criteria configuration: {0}")]
    InvalidCriteriaConfig(String),
    #[error("invalid weight configuration: {0}")]
    InvalidWeight(String),
    #[error("no active criteria carry a positive weight")]
    NoActiveCriteria,
    #[error("criterion '{criterion}' returned {value}, outside [0, 1]")]
    CriterionRange { criterion: String, value: f64 },
    #[error("candidate set is empty")]
    EmptyCandidateSet,
    #[error("ranking cancelled before all candidates were scored")]
    Cancelled,
}

impl DssError {
    /// Stable machine-readable tag for API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            DssError::DuplicateCriterion(_) => "duplicate_criterion",
            DssError::UnknownCriterion(_) => "unknown_criterion",
            DssError::InvalidCriteriaConfig(_) => "invalid_criteria_config",
            DssError::InvalidWeight(_) => "invalid_weight",
            DssError::NoActiveCriteria => "no_active_criteria",
            DssError::CriterionRange { .. } => "criterion_range",
            DssError::EmptyCandidateSet => "empty_candidate_set",
            DssError::Cancelled => "cancelled",
        }
    }

    /// True when the caller supplied bad input, as opposed to an engine defect.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            DssError::InvalidWeight(_) | DssError::NoActiveCriteria | DssError::EmptyCandidateSet
        )
    }
}
