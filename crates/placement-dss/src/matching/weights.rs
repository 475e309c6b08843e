use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::criteria::CriterionRegistry;
use super::error::DssError;

fn default_active() -> bool {
    true
}

/// Administrator-configured importance of one criterion (a `dss_weights` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub name: String,
    pub weight: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Weight {
    pub fn active(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            is_active: true,
        }
    }

    pub fn inactive(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            is_active: false,
        }
    }
}

/// Active weights rescaled to sum to one, ordered by criterion registration.
///
/// An empty value is legal and means no criterion contributes; the scoring engine refuses
/// to score against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedWeights {
    entries: Vec<(String, f64)>,
}

impl NormalizedWeights {
    pub fn load(weights: &[Weight], registry: &CriterionRegistry) -> Result<Self, DssError> {
        let mut seen = HashSet::new();
        let mut active = Vec::new();

        for weight in weights {
            if !weight.weight.is_finite() {
                return Err(invalid(format!(
                    "weight for '{}' must be a finite number",
                    weight.name
                )));
            }
            if weight.weight < 0.0 {
                return Err(invalid(format!(
                    "weight for '{}' is negative ({})",
                    weight.name, weight.weight
                )));
            }
            if !weight.is_active {
                continue;
            }

            let Some(position) = registry.position(&weight.name) else {
                return Err(invalid(format!(
                    "active weight references unknown criterion '{}'",
                    weight.name
                )));
            };
            if !seen.insert(weight.name.as_str()) {
                return Err(invalid(format!(
                    "criterion '{}' has more than one active weight",
                    weight.name
                )));
            }
            active.push((position, weight.name.clone(), weight.weight));
        }

        // Scale by the largest weight first so sums near f64::MAX cannot overflow.
        let largest = active
            .iter()
            .map(|(_, _, value)| *value)
            .fold(0.0, f64::max);
        if largest == 0.0 {
            return Ok(Self::default());
        }
        let total: f64 = active.iter().map(|(_, _, value)| value / largest).sum();

        active.sort_by_key(|(position, _, _)| *position);
        let entries = active
            .into_iter()
            .map(|(_, name, value)| (name, value / largest / total))
            .collect();

        Ok(Self { entries })
    }

    /// Fail with `NoActiveCriteria` rather than let an empty set score as zero.
    pub fn ensure_not_empty(&self) -> Result<(), DssError> {
        if self.entries.is_empty() {
            Err(DssError::NoActiveCriteria)
        } else {
            Ok(())
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(criterion, _)| criterion == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(criterion, value)| (criterion.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    name: String,
    weight: f64,
    #[serde(default)]
    is_active: Option<String>,
}

/// Parse a `name,weight,is_active` export of the weight table.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Weight>, DssError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut weights = Vec::new();
    for (index, row) in csv_reader.deserialize::<WeightRow>().enumerate() {
        let row = row.map_err(|err| invalid(format!("row {}: {err}", index + 1)))?;
        let is_active = match row.is_active.as_deref() {
            None | Some("") => true,
            Some(raw) => parse_flag(raw)
                .ok_or_else(|| invalid(format!("row {}: is_active '{raw}'", index + 1)))?,
        };
        weights.push(Weight {
            name: row.name,
            weight: row.weight,
            is_active,
        });
    }

    Ok(weights)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn invalid(message: String) -> DssError {
    warn!(%message, "rejected weight configuration");
    DssError::InvalidWeight(message)
}
