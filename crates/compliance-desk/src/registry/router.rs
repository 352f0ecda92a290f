use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ArtifactDraft, ArtifactId, ArtifactKind, ArtifactPatch};
use super::filter::ListQuery;
use super::repository::ArtifactRepository;
use super::service::{ArtifactService, ServiceError};
use super::views::{
    ArtifactView, CertificateCreate, CertificatePatchPayload, LicenseCreate, LicensePatchPayload,
    NotifyRequest,
};
use crate::notify::MailTransport;
use crate::storage::{DocumentStore, StorageCategory};

/// Maps a kind's wire payloads onto the shared engine. The two
/// implementations are the whole difference between the license and
/// certificate HTTP surfaces.
pub trait KindAdapter: Send + Sync + 'static {
    const KIND: ArtifactKind;
    type Create: DeserializeOwned + Into<ArtifactDraft> + Send;
    type Patch: DeserializeOwned + Into<ArtifactPatch> + Send;
}

pub struct LicenseAdapter;

impl KindAdapter for LicenseAdapter {
    const KIND: ArtifactKind = ArtifactKind::License;
    type Create = LicenseCreate;
    type Patch = LicensePatchPayload;
}

pub struct CertificateAdapter;

impl KindAdapter for CertificateAdapter {
    const KIND: ArtifactKind = ArtifactKind::Certificate;
    type Create = CertificateCreate;
    type Patch = CertificatePatchPayload;
}

/// Per-kind router state.
pub struct RegistryContext<R, M> {
    pub kind: ArtifactKind,
    pub service: Arc<ArtifactService<R, M>>,
    pub documents: Arc<DocumentStore>,
}

impl<R, M> Clone for RegistryContext<R, M> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            service: Arc::clone(&self.service),
            documents: Arc::clone(&self.documents),
        }
    }
}

/// Router builder exposing the license and certificate surfaces over
/// one shared service.
pub fn artifact_router<R, M>(
    service: Arc<ArtifactService<R, M>>,
    documents: Arc<DocumentStore>,
) -> Router
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    Router::new()
        .nest(
            "/api/v1/licenses",
            kind_router::<LicenseAdapter, R, M>(service.clone(), documents.clone()),
        )
        .nest(
            "/api/v1/certificates",
            kind_router::<CertificateAdapter, R, M>(service, documents),
        )
}

fn kind_router<A, R, M>(
    service: Arc<ArtifactService<R, M>>,
    documents: Arc<DocumentStore>,
) -> Router
where
    A: KindAdapter,
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    Router::new()
        .route(
            "/",
            get(list_handler::<R, M>).post(create_handler::<A, R, M>),
        )
        .route(
            "/:id",
            get(get_handler::<R, M>)
                .put(update_handler::<A, R, M>)
                .patch(update_handler::<A, R, M>)
                .delete(delete_handler::<R, M>),
        )
        .route("/:id/notify", post(notify_handler::<R, M>))
        .route(
            "/:id/document",
            post(upload_handler::<R, M>).get(download_handler::<R, M>),
        )
        .with_state(RegistryContext {
            kind: A::KIND,
            service,
            documents,
        })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    days_until_expiry: Option<i64>,
    /// Reference date override for deterministic runs; defaults to the
    /// local calendar date.
    #[serde(default)]
    today: Option<NaiveDate>,
}

pub(crate) async fn list_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let query = ListQuery {
        status: params.status,
        days_until_expiry: params.days_until_expiry,
    };

    match ctx.service.list(ctx.kind, &query, today) {
        Ok(artifacts) => {
            let views: Vec<ArtifactView> = artifacts.iter().map(ArtifactView::from_domain).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn create_handler<A, R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Json(payload): Json<A::Create>,
) -> Response
where
    A: KindAdapter,
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    match ctx.service.create(payload.into()) {
        Ok(artifact) => {
            (StatusCode::CREATED, Json(ArtifactView::from_domain(&artifact))).into_response()
        }
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn get_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    match ctx.service.get(ctx.kind, id) {
        Ok(artifact) => (StatusCode::OK, Json(ArtifactView::from_domain(&artifact))).into_response(),
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn update_handler<A, R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
    Json(payload): Json<A::Patch>,
) -> Response
where
    A: KindAdapter,
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    match ctx.service.update(ctx.kind, id, payload.into()) {
        Ok(artifact) => (StatusCode::OK, Json(ArtifactView::from_domain(&artifact))).into_response(),
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn delete_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    match ctx.service.remove(ctx.kind, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn notify_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
    Json(payload): Json<NotifyRequest>,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    for email in &payload.emails {
        if email.parse::<lettre::Address>().is_err() {
            let body = json!({ "error": format!("invalid recipient address '{email}'") });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    }

    match ctx
        .service
        .notify_expiry(ctx.kind, id, &payload.emails, payload.days_left)
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn upload_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
    mut multipart: Multipart,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    if let Err(err) = ctx.service.get(ctx.kind, id) {
        return error_response(ctx.kind, err);
    }

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                let body = json!({ "error": "missing 'file' field in upload" });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            Err(err) => {
                let body = json!({ "error": format!("malformed upload: {err}") });
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
        }
    };

    let file_name = field.file_name().map(str::to_string).unwrap_or_default();
    if !file_name.to_ascii_lowercase().ends_with(".pdf") {
        let body = json!({ "error": "upload must be a .pdf document" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            let body = json!({ "error": format!("malformed upload: {err}") });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let saved = ctx
        .documents
        .save(&bytes, StorageCategory::for_kind(ctx.kind), &file_name);
    let path = match saved {
        Ok(path) => path,
        Err(err) => {
            let body = json!({ "error": err.to_string() });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    match ctx
        .service
        .attach_document(ctx.kind, id, path.to_string_lossy().into_owned())
    {
        Ok(artifact) => (StatusCode::OK, Json(ArtifactView::from_domain(&artifact))).into_response(),
        Err(err) => error_response(ctx.kind, err),
    }
}

pub(crate) async fn download_handler<R, M>(
    State(ctx): State<RegistryContext<R, M>>,
    Path(id): Path<ArtifactId>,
) -> Response
where
    R: ArtifactRepository + 'static,
    M: MailTransport + 'static,
{
    let artifact = match ctx.service.get(ctx.kind, id) {
        Ok(artifact) => artifact,
        Err(err) => return error_response(ctx.kind, err),
    };

    let Some(path) = artifact.document_path else {
        let body = json!({ "error": "document not found" });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"{}_{}.pdf\"",
                ctx.kind.label(),
                id
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(_) => {
            let body = json!({ "error": "document not found" });
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}

fn error_response(kind: ArtifactKind, err: ServiceError) -> Response {
    if err.is_not_found() {
        let body = json!({ "error": format!("{} not found", kind.label()) });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }

    match err {
        ServiceError::InvalidStatus(_) => {
            let body = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        other => {
            let body = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
