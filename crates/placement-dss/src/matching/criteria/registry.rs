use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::config::CriteriaConfig;
use super::rules::{self, AffinityTable};
use crate::matching::domain::{InternshipProfile, StudentProfile};
use crate::matching::error::DssError;

/// Pure scoring function returning a sub-score in `[0, 1]`.
pub type CriterionFn = Arc<dyn Fn(&StudentProfile, &InternshipProfile) -> f64 + Send + Sync>;

#[derive(Clone)]
struct RegisteredCriterion {
    name: String,
    criterion: CriterionFn,
}

/// Named criteria in registration order.
///
/// Registration order is the order in which score details are reported, so it must stay
/// stable for a given engine build. The registry is populated up front and then shared
/// read-only behind an `Arc`.
#[derive(Default, Clone)]
pub struct CriterionRegistry {
    entries: Vec<RegisteredCriterion>,
    index: HashMap<String, usize>,
}

impl CriterionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `field_match`, `location_proximity`, `slot_availability`, `eligibility`.
    ///
    /// The affinity table is validated here so a bad configuration fails before any scoring.
    pub fn with_defaults(config: &CriteriaConfig) -> Result<Self, DssError> {
        let mut registry = Self::new();
        let affinities = Arc::new(AffinityTable::from_config(&config.field_affinities)?);
        let expected_demand = config.expected_demand;

        registry.insert(
            rules::FIELD_MATCH,
            Arc::new(
                move |student: &StudentProfile, internship: &InternshipProfile| {
                    rules::field_match(student, internship, &affinities)
                },
            ),
        );
        registry.insert(rules::LOCATION_PROXIMITY, Arc::new(rules::location_proximity));
        registry.insert(
            rules::SLOT_AVAILABILITY,
            Arc::new(
                move |_student: &StudentProfile, internship: &InternshipProfile| {
                    rules::slot_availability(internship, expected_demand)
                },
            ),
        );
        registry.insert(rules::ELIGIBILITY, Arc::new(rules::eligibility));
        Ok(registry)
    }

    pub fn register<F>(&mut self, name: impl Into<String>, criterion: F) -> Result<(), DssError>
    where
        F: Fn(&StudentProfile, &InternshipProfile) -> f64 + Send + Sync + 'static,
    {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(DssError::DuplicateCriterion(name));
        }
        self.insert(&name, Arc::new(criterion));
        Ok(())
    }

    fn insert(&mut self, name: &str, criterion: CriterionFn) {
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(RegisteredCriterion {
            name: name.to_string(),
            criterion,
        });
    }

    pub fn get(&self, name: &str) -> Result<&CriterionFn, DssError> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position].criterion)
            .ok_or_else(|| DssError::UnknownCriterion(name.to_string()))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a criterion and reject values outside `[0, 1]` instead of clamping them.
    pub fn evaluate(
        &self,
        name: &str,
        student: &StudentProfile,
        internship: &InternshipProfile,
    ) -> Result<f64, DssError> {
        let criterion = self.get(name)?;
        let value = criterion(student, internship);
        if !(0.0..=1.0).contains(&value) {
            return Err(DssError::CriterionRange {
                criterion: name.to_string(),
                value,
            });
        }
        Ok(value)
    }
}

impl fmt::Debug for CriterionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriterionRegistry")
            .field("criteria", &self.list_names())
            .finish()
    }
}
