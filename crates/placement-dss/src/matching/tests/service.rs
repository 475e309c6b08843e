use std::sync::Arc;

use super::common::*;
use crate::config::MatchingConfig;
use crate::matching::domain::{InternshipId, StudentId};
use crate::matching::error::DssError;
use crate::matching::service::{MatchService, MatchServiceError};
use crate::matching::store::{ScoreStore, StoreError};
use crate::matching::weights::Weight;

#[test]
fn match_internships_persists_each_returned_score() {
    let (service, store) = build_service();
    let candidates = vec![internship(1, 1), regional_internship(2, 1), internship(3, 2)];

    let matches = service
        .match_internships(&student(), &candidates, &equal_weights(), Some(2))
        .expect("matches");

    assert_eq!(matches.scores.len(), 2);
    assert_eq!(matches.persisted, 2);
    assert_eq!(store.writes(), 2);
    let stored = store
        .load_latest(StudentId(1), InternshipId(1))
        .expect("store reachable")
        .expect("snapshot stored");
    assert_eq!(stored, matches.scores[0]);
    assert!(store
        .load_latest(StudentId(1), InternshipId(2))
        .expect("store reachable")
        .is_none());
}

#[test]
fn match_students_ranks_applicants_for_a_posting() {
    let (service, store) = build_service();
    let mut remote = student_with(2, 1);
    remote.location = Some("Iloilo City, Iloilo".to_string());

    let matches = service
        .match_students(
            &internship(5, 1),
            &[remote, student_with(3, 2)],
            &equal_weights(),
            None,
        )
        .expect("matches");

    let order: Vec<StudentId> = matches.scores.iter().map(|score| score.student_id).collect();
    assert_eq!(order, vec![StudentId(3), StudentId(2)]);
    assert_eq!(store.len(), 2);
}

#[test]
fn rescoring_a_pair_overwrites_the_latest_snapshot() {
    let (service, store) = build_service();
    let posting = regional_internship(4, 1);

    let first = service
        .score_pair(&student(), &posting, &equal_weights())
        .expect("scores");
    let second = service
        .score_pair(
            &student(),
            &posting,
            &[Weight::active("location_proximity", 1.0)],
        )
        .expect("scores");

    assert_eq!(first.score, 72.5);
    assert_eq!(second.score, 30.0);
    assert_eq!(store.writes(), 2);
    assert_eq!(store.len(), 1);
    let latest = service
        .latest(StudentId(1), InternshipId(4))
        .expect("store reachable")
        .expect("snapshot stored");
    assert_eq!(latest, second);
}

#[test]
fn scenario_c_invalid_weights_fail_before_scoring_or_persisting() {
    let (service, store) = build_service();
    let mut weights = equal_weights();
    weights.push(Weight::active("gpa_match", 1.0));

    match service.match_internships(&student(), &[internship(1, 1)], &weights, None) {
        Err(MatchServiceError::Dss(DssError::InvalidWeight(message))) => {
            assert!(message.contains("gpa_match"))
        }
        other => panic!("expected invalid weight, got {other:?}"),
    }
    assert_eq!(store.writes(), 0);
}

#[test]
fn store_failures_surface_after_ranking() {
    let service = MatchService::new(Arc::new(UnavailableStore), &MatchingConfig::default())
        .expect("default criteria register");

    match service.match_internships(&student(), &[internship(1, 1)], &equal_weights(), None) {
        Err(MatchServiceError::Persist {
            saved: 0,
            source: StoreError::Unavailable(reason),
        }) => assert_eq!(reason, "database offline"),
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[test]
fn failed_save_reports_snapshots_already_written() {
    let store = Arc::new(FailingAfterStore::new(2));
    let service = MatchService::new(store.clone(), &MatchingConfig::default())
        .expect("default criteria register");
    let candidates = [internship(1, 1), internship(2, 2), internship(3, 3)];

    let error = service
        .match_internships(&student(), &candidates, &equal_weights(), None)
        .expect_err("third save fails");

    match &error {
        MatchServiceError::Persist {
            saved,
            source: StoreError::Rejected(_),
        } => assert_eq!(*saved, 2),
        other => panic!("expected partial persist, got {other:?}"),
    }
    assert_eq!(store.saved(), 2);
    assert!(matches!(error.store_error(), Some(StoreError::Rejected(_))));
}

#[test]
fn latest_reads_the_store_without_recomputing() {
    let (service, store) = build_service();

    assert!(service
        .latest(StudentId(1), InternshipId(1))
        .expect("store reachable")
        .is_none());
    assert_eq!(store.writes(), 0);
    assert_eq!(
        service.criteria(),
        vec![
            "field_match",
            "location_proximity",
            "slot_availability",
            "eligibility"
        ]
    );
}
