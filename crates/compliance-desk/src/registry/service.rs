use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::domain::{Artifact, ArtifactDraft, ArtifactId, ArtifactKind, ArtifactPatch};
use super::filter::{self, ListQuery};
use super::repository::{ArtifactRepository, RepositoryError};
use crate::notify::{ExpiryNotifier, MailTransport};

/// Horizon used by the dashboard's "expiring soon" buckets.
const EXPIRING_SOON_DAYS: i64 = 30;

/// Service composing the artifact repository and the expiry notifier.
///
/// Every operation that depends on the calendar takes an explicit
/// `today`; the service never reads the system clock.
pub struct ArtifactService<R, M> {
    repository: Arc<R>,
    notifier: ExpiryNotifier<M>,
}

impl<R, M> ArtifactService<R, M>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    pub fn new(repository: Arc<R>, transport: Arc<M>) -> Self {
        Self {
            repository,
            notifier: ExpiryNotifier::new(transport),
        }
    }

    pub fn create(&self, draft: ArtifactDraft) -> Result<Artifact, ServiceError> {
        Ok(self.repository.create(draft)?)
    }

    pub fn get(&self, kind: ArtifactKind, id: ArtifactId) -> Result<Artifact, ServiceError> {
        let artifact = self
            .repository
            .fetch(kind, id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(artifact)
    }

    pub fn update(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        patch: ArtifactPatch,
    ) -> Result<Artifact, ServiceError> {
        Ok(self.repository.update(kind, id, patch)?)
    }

    pub fn remove(&self, kind: ArtifactKind, id: ArtifactId) -> Result<(), ServiceError> {
        Ok(self.repository.remove(kind, id)?)
    }

    /// List artifacts of `kind`, filtered and ordered by ascending
    /// expiry date. The overdue sweep runs first, as a side effect of
    /// every listing, so stale conditions are promoted before the
    /// caller sees them.
    pub fn list(
        &self,
        kind: ArtifactKind,
        query: &ListQuery,
        today: NaiveDate,
    ) -> Result<Vec<Artifact>, ServiceError> {
        let promoted = self.repository.sweep_overdue(today)?;
        if promoted > 0 {
            debug!(promoted, "overdue sweep promoted conditions");
        }

        let artifacts = self.repository.list(kind)?;
        Ok(filter::apply(artifacts, query, today)?)
    }

    pub fn attach_document(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        path: String,
    ) -> Result<Artifact, ServiceError> {
        Ok(self.repository.set_document_path(kind, id, path)?)
    }

    /// Dispatch an expiry warning for the artifact to `recipients`.
    /// Fails only when the artifact is absent; delivery itself is best
    /// effort and never surfaces (see the notify module policy).
    pub fn notify_expiry(
        &self,
        kind: ArtifactKind,
        id: ArtifactId,
        recipients: &[String],
        days_left: i64,
    ) -> Result<(), ServiceError> {
        let artifact = self.get(kind, id)?;
        self.notifier
            .notify_expiry(recipients, &artifact.name, days_left);
        Ok(())
    }

    /// Totals surfaced on the landing dashboard. Reads only; the sweep
    /// stays attached to listing calls.
    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardSummary, ServiceError> {
        let licenses = self.repository.list(ArtifactKind::License)?;
        let certificates = self.repository.list(ArtifactKind::Certificate)?;

        let expiring = |artifacts: &[Artifact]| {
            artifacts
                .iter()
                .filter(|artifact| artifact.expires_within(today, EXPIRING_SOON_DAYS))
                .count()
        };

        Ok(DashboardSummary {
            licenses_total: licenses.len(),
            licenses_expiring_soon: expiring(&licenses),
            certificates_total: certificates.len(),
            certificates_expiring_soon: expiring(&certificates),
        })
    }
}

/// Dashboard counters; "expiring soon" means within thirty days of the
/// reference date, expired included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub licenses_total: usize,
    pub licenses_expiring_soon: usize,
    pub certificates_total: usize,
    pub certificates_expiring_soon: usize,
}

/// Error raised by the artifact service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("status: {0}")]
    InvalidStatus(#[from] super::domain::StatusParseError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Repository(RepositoryError::NotFound))
    }
}
