use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::notify::{MailError, MailMessage, MailTransport};
use crate::registry::domain::{
    ArtifactDraft, ArtifactStatus, ConditionDraft, ConditionStatus, KindDetail,
};
use crate::registry::router::artifact_router;
use crate::registry::service::ArtifactService;
use crate::registry::store::InMemoryArtifactStore;
use crate::storage::DocumentStore;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn license_draft(name: &str, expiry: NaiveDate) -> ArtifactDraft {
    ArtifactDraft {
        name: name.to_string(),
        detail: KindDetail::License {
            issuing_agency: "State Environmental Agency".to_string(),
        },
        issue_date: None,
        expiry_date: expiry,
        status: ArtifactStatus::Pending,
        notes: None,
        conditions: Vec::new(),
    }
}

pub(super) fn certificate_draft(property_name: &str, expiry: NaiveDate) -> ArtifactDraft {
    ArtifactDraft {
        name: property_name.to_string(),
        detail: KindDetail::Certificate {
            property_address: Some("Industrial Ave 500".to_string()),
            technical_responsible: Some("R. Meyer".to_string()),
        },
        issue_date: None,
        expiry_date: expiry,
        status: ArtifactStatus::Pending,
        notes: None,
        conditions: Vec::new(),
    }
}

pub(super) fn condition(
    title: &str,
    due_date: Option<NaiveDate>,
    status: ConditionStatus,
) -> ConditionDraft {
    ConditionDraft {
        title: title.to_string(),
        description: None,
        responsible: None,
        due_date,
        status,
        completion_notes: None,
        completed_at: None,
    }
}

pub(super) fn build_service() -> (
    ArtifactService<InMemoryArtifactStore, RecordingMailer>,
    Arc<InMemoryArtifactStore>,
    Arc<RecordingMailer>,
) {
    let repository = Arc::new(InMemoryArtifactStore::default());
    let mailer = Arc::new(RecordingMailer::configured());
    let service = ArtifactService::new(repository.clone(), mailer.clone());
    (service, repository, mailer)
}

pub(super) fn router_with(
    service: ArtifactService<InMemoryArtifactStore, RecordingMailer>,
) -> Router {
    let documents = Arc::new(DocumentStore::new(std::env::temp_dir()));
    artifact_router(Arc::new(service), documents)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Transport double recording every message it accepts.
pub(super) struct RecordingMailer {
    configured: bool,
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub(super) fn configured() -> Self {
        Self {
            configured: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn unconfigured() -> Self {
        Self {
            configured: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }
}

impl MailTransport for RecordingMailer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mail mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Transport double that is configured but always fails to deliver.
pub(super) struct FailingMailer;

impl MailTransport for FailingMailer {
    fn is_configured(&self) -> bool {
        true
    }

    fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("relay refused".to_string()))
    }
}
