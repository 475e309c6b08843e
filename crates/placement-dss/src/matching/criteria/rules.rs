use std::collections::{HashMap, HashSet};

use super::config::FieldAffinity;
use crate::matching::domain::{normalize_token, InternshipProfile, StudentProfile};
use crate::matching::error::DssError;

pub const FIELD_MATCH: &str = "field_match";
pub const LOCATION_PROXIMITY: &str = "location_proximity";
pub const SLOT_AVAILABILITY: &str = "slot_availability";
pub const ELIGIBILITY: &str = "eligibility";

const SAME_REGION_SCORE: f64 = 0.3;

/// Symmetric lookup over normalized field pairs.
#[derive(Debug, Default)]
pub(crate) struct AffinityTable {
    pairs: HashMap<(String, String), f64>,
}

impl AffinityTable {
    /// Build the table, rejecting scores outside `[0, 1]` and pairs listed more than once.
    pub(crate) fn from_config(affinities: &[FieldAffinity]) -> Result<Self, DssError> {
        let mut pairs = HashMap::new();
        for affinity in affinities {
            if !(0.0..=1.0).contains(&affinity.score) {
                return Err(DssError::InvalidCriteriaConfig(format!(
                    "affinity '{}' ~ '{}' scores {}, outside [0, 1]",
                    affinity.field, affinity.related, affinity.score
                )));
            }

            let field = normalize_token(&affinity.field);
            let related = normalize_token(&affinity.related);
            if pairs.contains_key(&(field.clone(), related.clone())) {
                return Err(DssError::InvalidCriteriaConfig(format!(
                    "affinity '{}' ~ '{}' is listed more than once",
                    affinity.field, affinity.related
                )));
            }
            pairs.insert((field.clone(), related.clone()), affinity.score);
            pairs.insert((related, field), affinity.score);
        }
        Ok(Self { pairs })
    }

    fn lookup(&self, field: &str, related: &str) -> Option<f64> {
        self.pairs
            .get(&(field.to_string(), related.to_string()))
            .copied()
    }
}

pub(crate) fn field_match(
    student: &StudentProfile,
    internship: &InternshipProfile,
    affinities: &AffinityTable,
) -> f64 {
    let (Some(preferred), Some(listed)) = (
        non_empty(student.preferred_field.as_deref()),
        non_empty(internship.field.as_deref()),
    ) else {
        return 0.0;
    };

    if preferred == listed {
        return 1.0;
    }

    affinities.lookup(&preferred, &listed).unwrap_or(0.0)
}

pub(crate) fn location_proximity(student: &StudentProfile, internship: &InternshipProfile) -> f64 {
    let (Some(home), Some(site)) = (
        non_empty(student.location.as_deref()),
        non_empty(internship.location.as_deref()),
    ) else {
        return 0.0;
    };

    if home == site {
        return 1.0;
    }

    match (region_token(&home), region_token(&site)) {
        (Some(left), Some(right)) if left == right => SAME_REGION_SCORE,
        _ => 0.0,
    }
}

pub(crate) fn slot_availability(internship: &InternshipProfile, expected_demand: u32) -> f64 {
    if internship.slots_available <= 0 {
        return 0.0;
    }
    if expected_demand == 0 {
        return 1.0;
    }

    (internship.slots_available as f64 / expected_demand as f64).min(1.0)
}

pub(crate) fn eligibility(student: &StudentProfile, internship: &InternshipProfile) -> f64 {
    if !internship.is_open() {
        return 0.0;
    }

    let credentials: HashSet<String> = student.credentials().into_iter().collect();
    let meets_all = internship
        .requirements
        .iter()
        .map(|requirement| normalize_token(requirement))
        .filter(|requirement| !requirement.is_empty())
        .all(|requirement| credentials.contains(&requirement));

    if meets_all {
        1.0
    } else {
        0.0
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_token)
        .filter(|normalized| !normalized.is_empty())
}

/// Province or region level segment: the last comma-separated part of a location.
fn region_token(location: &str) -> Option<String> {
    location
        .rsplit(',')
        .next()
        .map(normalize_token)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::matching::criteria::CriteriaConfig;
    use crate::matching::domain::{InternshipId, StudentId};

    fn student(field: &str, location: &str) -> StudentProfile {
        StudentProfile {
            id: StudentId(1),
            preferred_field: Some(field.to_string()),
            location: Some(location.to_string()),
            course: Some("BSIT".to_string()),
            year_level: Some("4th Year".to_string()),
            qualifications: vec!["Java".to_string(), "SQL".to_string()],
            created_at: Utc.with_ymd_and_hms(2026, 1, 29, 0, 0, 0).unwrap(),
        }
    }

    fn internship(field: &str, location: &str) -> InternshipProfile {
        InternshipProfile {
            id: InternshipId(10),
            title: "Backend Intern".to_string(),
            field: Some(field.to_string()),
            location: Some(location.to_string()),
            status: "open".to_string(),
            slots_available: 3,
            requirements: vec!["sql".to_string(), " bsit ".to_string()],
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    fn table() -> AffinityTable {
        AffinityTable::from_config(&CriteriaConfig::default().field_affinities)
            .expect("standard affinities are valid")
    }

    #[test]
    fn field_match_prefers_exact_then_adjacent() {
        let affinities = table();
        assert_eq!(
            field_match(&student("IT", "Manila"), &internship(" it ", "Manila"), &affinities),
            1.0
        );
        assert_eq!(
            field_match(
                &student("Computer Science", "Manila"),
                &internship("IT", "Manila"),
                &affinities
            ),
            0.5
        );
        assert_eq!(
            field_match(&student("Nursing", "Manila"), &internship("IT", "Manila"), &affinities),
            0.0
        );
    }

    #[test]
    fn field_match_is_zero_without_a_preference() {
        let mut profile = student("IT", "Manila");
        profile.preferred_field = None;
        assert_eq!(
            field_match(&profile, &internship("IT", "Manila"), &table()),
            0.0
        );
    }

    #[test]
    fn location_proximity_scores_region_matches() {
        assert_eq!(
            location_proximity(&student("IT", "MANILA "), &internship("IT", "manila")),
            1.0
        );
        assert_eq!(
            location_proximity(
                &student("IT", "Makati, Metro Manila"),
                &internship("IT", "Taguig, Metro Manila")
            ),
            SAME_REGION_SCORE
        );
        assert_eq!(
            location_proximity(&student("IT", "Cebu City, Cebu"), &internship("IT", "Manila")),
            0.0
        );
    }

    #[test]
    fn slot_availability_saturates_at_expected_demand() {
        let mut posting = internship("IT", "Manila");
        assert_eq!(slot_availability(&posting, 5), 0.6);
        posting.slots_available = 12;
        assert_eq!(slot_availability(&posting, 5), 1.0);
        posting.slots_available = 0;
        assert_eq!(slot_availability(&posting, 5), 0.0);
        posting.slots_available = -2;
        assert_eq!(slot_availability(&posting, 5), 0.0);
    }

    #[test]
    fn eligibility_requires_open_status_and_all_requirements() {
        let profile = student("IT", "Manila");
        let mut posting = internship("IT", "Manila");
        assert_eq!(eligibility(&profile, &posting), 1.0);

        posting.requirements.push("Kubernetes".to_string());
        assert_eq!(eligibility(&profile, &posting), 0.0);

        posting.requirements.clear();
        posting.status = "draft".to_string();
        assert_eq!(eligibility(&profile, &posting), 0.0);

        posting.status = " Open".to_string();
        assert_eq!(eligibility(&profile, &posting), 1.0);
    }
}
