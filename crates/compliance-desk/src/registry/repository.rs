use chrono::NaiveDate;

use super::domain::{Artifact, ArtifactDraft, ArtifactId, ArtifactKind, ArtifactPatch};

/// Storage abstraction so the service layer can be exercised in
/// isolation.
///
/// Contract: each mutation commits atomically (an artifact and its
/// condition set change together or not at all), `remove` cascades to
/// the owned conditions, and `sweep_overdue` applies its whole batch as
/// one unit. Ids are allocated per kind, and kind-scoped lookups never
/// resolve an artifact of the other kind. `list` returns artifacts in
/// insertion order; callers impose their own ordering on top.
pub trait ArtifactRepository: Send + Sync {
    fn create(&self, draft: ArtifactDraft) -> Result<Artifact, RepositoryError>;

    fn fetch(&self, kind: ArtifactKind, id: ArtifactId)
        -> Result<Option<Artifact>, RepositoryError>;

    fn update(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        patch: ArtifactPatch,
    ) -> Result<Artifact, RepositoryError>;

    fn remove(&self, kind: ArtifactKind, id: ArtifactId) -> Result<(), RepositoryError>;

    fn list(&self, kind: ArtifactKind) -> Result<Vec<Artifact>, RepositoryError>;

    fn set_document_path(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        path: String,
    ) -> Result<Artifact, RepositoryError>;

    /// Promote every condition with a due date strictly before `today`
    /// that is not completed to overdue, across both kinds. Returns the
    /// number of rows whose status actually changed; finding zero
    /// candidates is not an error, and re-promoting an already overdue
    /// row is a no-op.
    fn sweep_overdue(&self, today: NaiveDate) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
