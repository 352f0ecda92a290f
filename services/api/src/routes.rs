use crate::infra::{ApiContext, AppState};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use compliance_desk::error::AppError;
use compliance_desk::notify::MailTransport;
use compliance_desk::registry::{
    artifact_router, ArtifactKind, ArtifactRepository, ArtifactService, DashboardSummary,
    ListQuery,
};
use compliance_desk::report::{self, ReportEntry, TextDocument};
use compliance_desk::storage::DocumentStore;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_artifact_routes<R, M>(
    service: Arc<ArtifactService<R, M>>,
    documents: Arc<DocumentStore>,
) -> axum::Router
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    let context = ApiContext::new(service.clone(), documents.clone());

    let reporting = axum::Router::new()
        .route(
            "/api/v1/dashboard",
            axum::routing::get(dashboard_endpoint::<R, M>),
        )
        .route(
            "/api/v1/reports/licenses",
            axum::routing::get(license_report_endpoint::<R, M>),
        )
        .route(
            "/api/v1/reports/certificates",
            axum::routing::get(certificate_report_endpoint::<R, M>),
        )
        .with_state(context);

    artifact_router(service, documents)
        .merge(reporting)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardParams {
    /// Reference date override for deterministic runs.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn dashboard_endpoint<R, M>(
    State(ctx): State<ApiContext<R, M>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardSummary>, AppError>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let summary = ctx.service.dashboard(today)?;
    Ok(Json(summary))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportParams {
    #[serde(default)]
    pub(crate) days_until_expiry: Option<i64>,
    /// Reference date override for deterministic runs.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn license_report_endpoint<R, M>(
    State(ctx): State<ApiContext<R, M>>,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    artifact_report(ctx, ArtifactKind::License, params).await
}

pub(crate) async fn certificate_report_endpoint<R, M>(
    State(ctx): State<ApiContext<R, M>>,
    Query(params): Query<ReportParams>,
) -> Result<Response, AppError>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    artifact_report(ctx, ArtifactKind::Certificate, params).await
}

async fn artifact_report<R, M>(
    ctx: ApiContext<R, M>,
    kind: ArtifactKind,
    params: ReportParams,
) -> Result<Response, AppError>
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let query = ListQuery {
        status: None,
        days_until_expiry: params.days_until_expiry,
    };

    let artifacts = ctx.service.list(kind, &query, today)?;
    let entries: Vec<ReportEntry> = artifacts.iter().map(ReportEntry::from_artifact).collect();

    let (title, file_name) = match kind {
        ArtifactKind::License => ("License Expiry Report", format!("licenses_{today}.txt")),
        ArtifactKind::Certificate => (
            "Certificate Expiry Report",
            format!("certificates_{today}.txt"),
        ),
    };

    let mut document = TextDocument::new(ctx.documents.report_dir(), &file_name);
    let path = report::generate(title, &entries, &mut document)?;
    let bytes = tokio::fs::read(&path).await?;

    let content_type = mime_guess::from_path(&path).first_or_text_plain();
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
