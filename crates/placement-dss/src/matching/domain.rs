use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a student record owned by the CRUD layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student-{}", self.0)
    }
}

/// Identifier of an internship posting owned by the CRUD layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternshipId(pub u64);

impl fmt::Display for InternshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internship-{}", self.0)
    }
}

/// Already-validated student attributes consumed by the criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    #[serde(default)]
    pub preferred_field: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year_level: Option<String>,
    /// Skills and certifications checked against internship requirements.
    #[serde(default)]
    pub qualifications: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl StudentProfile {
    /// Normalized credentials: qualifications plus course and year level.
    pub fn credentials(&self) -> Vec<String> {
        self.qualifications
            .iter()
            .map(String::as_str)
            .chain(self.course.as_deref())
            .chain(self.year_level.as_deref())
            .map(normalize_token)
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Already-validated internship attributes consumed by the criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipProfile {
    pub id: InternshipId,
    pub title: String,
    /// Listed field or category of the posting.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub status: String,
    pub slots_available: i64,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl InternshipProfile {
    pub fn is_open(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("open")
    }
}

/// Case-insensitive, whitespace-trimmed comparison key.
pub(crate) fn normalize_token(value: &str) -> String {
    value.trim().to_lowercase()
}
