//! Artifact registry: the data model, the storage contract, the
//! overdue sweep, the expiry filter, and the kind-scoped HTTP adapters.

pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Artifact, ArtifactDraft, ArtifactId, ArtifactKind, ArtifactPatch, ArtifactStatus, Condition,
    ConditionDraft, ConditionId, ConditionStatus, KindDetail, KindDetailPatch, StatusParseError,
};
pub use filter::ListQuery;
pub use repository::{ArtifactRepository, RepositoryError};
pub use router::artifact_router;
pub use service::{ArtifactService, DashboardSummary, ServiceError};
pub use store::InMemoryArtifactStore;
