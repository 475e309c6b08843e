use serde::{Deserialize, Serialize};

/// Slot count at which `slot_availability` reaches 1.0.
pub const DEFAULT_EXPECTED_DEMAND: u32 = 5;

const ADJACENT_FIELD_SCORE: f64 = 0.5;

/// Partial credit awarded when a student's preferred field neighbours the listed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAffinity {
    pub field: String,
    pub related: String,
    pub score: f64,
}

impl FieldAffinity {
    pub fn new(field: &str, related: &str, score: f64) -> Self {
        Self {
            field: field.to_string(),
            related: related.to_string(),
            score,
        }
    }
}

/// Parameters captured by the default criteria when they are registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaConfig {
    pub expected_demand: u32,
    pub field_affinities: Vec<FieldAffinity>,
}

impl CriteriaConfig {
    /// Standard similarity table for commonly paired degree programmes.
    pub fn standard_affinities() -> Vec<FieldAffinity> {
        [
            ("IT", "Computer Science"),
            ("IT", "Information Systems"),
            ("Computer Science", "Information Systems"),
            ("Computer Science", "Engineering"),
            ("Engineering", "Architecture"),
            ("Business Administration", "Accounting"),
            ("Business Administration", "Marketing"),
            ("Accounting", "Finance"),
            ("Hospitality Management", "Tourism"),
            ("Nursing", "Medical Technology"),
            ("Education", "Psychology"),
            ("Communication", "Marketing"),
        ]
        .into_iter()
        .map(|(field, related)| FieldAffinity::new(field, related, ADJACENT_FIELD_SCORE))
        .collect()
    }
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        Self {
            expected_demand: DEFAULT_EXPECTED_DEMAND,
            field_affinities: Self::standard_affinities(),
        }
    }
}
