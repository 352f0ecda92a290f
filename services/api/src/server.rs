use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_artifact_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use compliance_desk::config::AppConfig;
use compliance_desk::error::AppError;
use compliance_desk::notify::SmtpMailer;
use compliance_desk::registry::{ArtifactService, InMemoryArtifactStore};
use compliance_desk::storage::DocumentStore;
use compliance_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryArtifactStore::default());
    let mailer = Arc::new(SmtpMailer::from_config(config.mail.clone()));
    let service = Arc::new(ArtifactService::new(repository, mailer));
    let documents = Arc::new(DocumentStore::new(&config.storage.base_dir));

    let app = with_artifact_routes(service, documents)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
