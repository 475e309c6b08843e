use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::MatchingConfig;
use crate::matching::criteria::{CriteriaConfig, CriterionRegistry};
use crate::matching::domain::{InternshipId, InternshipProfile, StudentId, StudentProfile};
use crate::matching::engine::{MatchScore, ScoringEngine};
use crate::matching::ranking::RankingService;
use crate::matching::service::MatchService;
use crate::matching::store::{ScoreStore, StoreError};
use crate::matching::weights::{NormalizedWeights, Weight};

pub(super) fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn student() -> StudentProfile {
    StudentProfile {
        id: StudentId(1),
        preferred_field: Some("IT".to_string()),
        location: Some("Manila".to_string()),
        course: Some("BSIT".to_string()),
        year_level: Some("4th Year".to_string()),
        qualifications: vec!["Java".to_string(), "SQL".to_string()],
        created_at: day(1),
    }
}

pub(super) fn student_with(id: u64, created_day: u32) -> StudentProfile {
    StudentProfile {
        id: StudentId(id),
        created_at: day(created_day),
        ..student()
    }
}

pub(super) fn internship(id: u64, created_day: u32) -> InternshipProfile {
    InternshipProfile {
        id: InternshipId(id),
        title: format!("IT Intern {id}"),
        field: Some("IT".to_string()),
        location: Some("Manila".to_string()),
        status: "open".to_string(),
        slots_available: 5,
        requirements: vec!["SQL".to_string()],
        created_at: day(created_day),
    }
}

/// Posting that lands on 72.50 against `student()` under equal weights.
pub(super) fn regional_internship(id: u64, created_day: u32) -> InternshipProfile {
    InternshipProfile {
        location: Some("Quezon City, Manila".to_string()),
        slots_available: 3,
        ..internship(id, created_day)
    }
}

pub(super) fn equal_weights() -> Vec<Weight> {
    vec![
        Weight::active("field_match", 1.0),
        Weight::active("location_proximity", 1.0),
        Weight::active("slot_availability", 1.0),
        Weight::active("eligibility", 1.0),
    ]
}

pub(super) fn registry() -> Arc<CriterionRegistry> {
    Arc::new(
        CriterionRegistry::with_defaults(&CriteriaConfig::default()).expect("defaults register"),
    )
}

pub(super) fn normalized(weights: &[Weight]) -> NormalizedWeights {
    NormalizedWeights::load(weights, &registry()).expect("weights load")
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(registry())
}

pub(super) fn ranking() -> RankingService {
    RankingService::new(engine())
}

pub(super) fn build_service() -> (MatchService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = MatchService::new(store.clone(), &MatchingConfig::default())
        .expect("default criteria register");
    (service, store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    scores: Mutex<HashMap<(StudentId, InternshipId), MatchScore>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(super) fn len(&self) -> usize {
        self.scores.lock().expect("store mutex poisoned").len()
    }
}

impl ScoreStore for MemoryStore {
    fn save(&self, score: &MatchScore) -> Result<(), StoreError> {
        let mut guard = self.scores.lock().expect("store mutex poisoned");
        guard.insert((score.student_id, score.internship_id), score.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_latest(
        &self,
        student_id: StudentId,
        internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, StoreError> {
        let guard = self.scores.lock().expect("store mutex poisoned");
        Ok(guard.get(&(student_id, internship_id)).cloned())
    }
}

/// Accepts `limit` saves, then rejects every further write.
pub(super) struct FailingAfterStore {
    limit: usize,
    saved: AtomicUsize,
}

impl FailingAfterStore {
    pub(super) fn new(limit: usize) -> Self {
        Self {
            limit,
            saved: AtomicUsize::new(0),
        }
    }

    pub(super) fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }
}

impl ScoreStore for FailingAfterStore {
    fn save(&self, _score: &MatchScore) -> Result<(), StoreError> {
        if self.saved() >= self.limit {
            return Err(StoreError::Rejected("constraint violation".to_string()));
        }
        self.saved.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_latest(
        &self,
        _student_id: StudentId,
        _internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, StoreError> {
        Ok(None)
    }
}

pub(super) struct UnavailableStore;

impl ScoreStore for UnavailableStore {
    fn save(&self, _score: &MatchScore) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn load_latest(
        &self,
        _student_id: StudentId,
        _internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
