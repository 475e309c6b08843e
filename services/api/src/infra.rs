use metrics_exporter_prometheus::PrometheusHandle;
use placement_dss::matching::{InternshipId, MatchScore, ScoreStore, StoreError, StudentId};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type SnapshotTable = HashMap<(StudentId, InternshipId), MatchScore>;

/// Process-local snapshot table standing in for the `match_scores` table of the CRUD layer.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreStore {
    snapshots: Arc<Mutex<SnapshotTable>>,
}

impl InMemoryScoreStore {
    fn guard(&self) -> Result<MutexGuard<'_, SnapshotTable>, StoreError> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Unavailable("snapshot table lock poisoned".to_string()))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.guard().expect("snapshot table readable").len()
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn save(&self, score: &MatchScore) -> Result<(), StoreError> {
        let mut table = self.guard()?;
        table.insert((score.student_id, score.internship_id), score.clone());
        Ok(())
    }

    fn load_latest(
        &self,
        student_id: StudentId,
        internship_id: InternshipId,
    ) -> Result<Option<MatchScore>, StoreError> {
        let table = self.guard()?;
        Ok(table.get(&(student_id, internship_id)).cloned())
    }
}
