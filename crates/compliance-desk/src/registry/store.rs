use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use super::domain::{
    Artifact, ArtifactDraft, ArtifactId, ArtifactKind, ArtifactPatch, Condition, ConditionDraft,
    ConditionId, ConditionStatus,
};
use super::repository::{ArtifactRepository, RepositoryError};

/// Reference [`ArtifactRepository`] backed by process memory.
///
/// A single mutex over the whole registry state makes every mutation
/// and the overdue sweep atomic, which is all the repository contract
/// asks for at this workload.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    inner: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    artifacts: BTreeMap<(ArtifactKind, ArtifactId), Artifact>,
    next_license_id: ArtifactId,
    next_certificate_id: ArtifactId,
    next_condition_id: ConditionId,
}

impl RegistryState {
    fn next_artifact_id(&mut self, kind: ArtifactKind) -> ArtifactId {
        let counter = match kind {
            ArtifactKind::License => &mut self.next_license_id,
            ArtifactKind::Certificate => &mut self.next_certificate_id,
        };
        *counter += 1;
        *counter
    }

    fn materialize_conditions(
        &mut self,
        artifact_id: ArtifactId,
        drafts: Vec<ConditionDraft>,
    ) -> Vec<Condition> {
        drafts
            .into_iter()
            .map(|draft| {
                self.next_condition_id += 1;
                Condition::from_draft(self.next_condition_id, artifact_id, draft)
            })
            .collect()
    }
}

impl ArtifactRepository for InMemoryArtifactStore {
    fn create(&self, draft: ArtifactDraft) -> Result<Artifact, RepositoryError> {
        let mut state = self.inner.lock().expect("registry mutex poisoned");

        let kind = draft.detail.kind();
        let id = state.next_artifact_id(kind);
        let conditions = state.materialize_conditions(id, draft.conditions);

        let artifact = Artifact {
            id,
            name: draft.name,
            detail: draft.detail,
            issue_date: draft.issue_date,
            expiry_date: draft.expiry_date,
            status: draft.status,
            notes: draft.notes,
            document_path: None,
            conditions,
        };

        state.artifacts.insert((kind, id), artifact.clone());
        Ok(artifact)
    }

    fn fetch(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
    ) -> Result<Option<Artifact>, RepositoryError> {
        let state = self.inner.lock().expect("registry mutex poisoned");
        Ok(state.artifacts.get(&(kind, id)).cloned())
    }

    fn update(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        patch: ArtifactPatch,
    ) -> Result<Artifact, RepositoryError> {
        let mut state = self.inner.lock().expect("registry mutex poisoned");

        let mut artifact = state
            .artifacts
            .get(&(kind, id))
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        // Replace-by-set: a patch that carries conditions discards the
        // stored set entirely and the new rows get fresh identities.
        if let Some(replacement) = artifact.apply_patch(patch) {
            artifact.conditions = state.materialize_conditions(id, replacement);
        }

        state.artifacts.insert((kind, id), artifact.clone());
        Ok(artifact)
    }

    fn remove(&self, kind: ArtifactKind, id: ArtifactId) -> Result<(), RepositoryError> {
        let mut state = self.inner.lock().expect("registry mutex poisoned");
        state
            .artifacts
            .remove(&(kind, id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, RepositoryError> {
        let state = self.inner.lock().expect("registry mutex poisoned");
        Ok(state
            .artifacts
            .range((kind, ArtifactId::MIN)..=(kind, ArtifactId::MAX))
            .map(|(_, artifact)| artifact.clone())
            .collect())
    }

    fn set_document_path(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        path: String,
    ) -> Result<Artifact, RepositoryError> {
        let mut state = self.inner.lock().expect("registry mutex poisoned");
        let artifact = state
            .artifacts
            .get_mut(&(kind, id))
            .ok_or(RepositoryError::NotFound)?;
        artifact.document_path = Some(path);
        Ok(artifact.clone())
    }

    fn sweep_overdue(&self, today: NaiveDate) -> Result<usize, RepositoryError> {
        let mut state = self.inner.lock().expect("registry mutex poisoned");

        let mut promoted = 0;
        for artifact in state.artifacts.values_mut() {
            for condition in &mut artifact.conditions {
                if condition.is_past_due(today) && condition.status != ConditionStatus::Overdue {
                    condition.status = ConditionStatus::Overdue;
                    promoted += 1;
                }
            }
        }

        Ok(promoted)
    }
}
