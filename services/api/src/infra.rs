use chrono::NaiveDate;
use compliance_desk::notify::MailTransport;
use compliance_desk::registry::{ArtifactRepository, ArtifactService};
use compliance_desk::storage::DocumentStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared state for the dashboard and report endpoints, which sit next
/// to the kind-scoped artifact routers.
pub(crate) struct ApiContext<R, M> {
    pub(crate) service: Arc<ArtifactService<R, M>>,
    pub(crate) documents: Arc<DocumentStore>,
}

impl<R, M> Clone for ApiContext<R, M> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<R, M> ApiContext<R, M>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    pub(crate) fn new(service: Arc<ArtifactService<R, M>>, documents: Arc<DocumentStore>) -> Self {
        Self { service, documents }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
