mod config;
mod registry;
pub(crate) mod rules;

pub use config::{CriteriaConfig, FieldAffinity, DEFAULT_EXPECTED_DEMAND};
pub use registry::{CriterionFn, CriterionRegistry};
pub use rules::{ELIGIBILITY, FIELD_MATCH, LOCATION_PROXIMITY, SLOT_AVAILABILITY};
