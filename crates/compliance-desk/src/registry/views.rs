//! Wire shapes for the two artifact kinds.
//!
//! One lifecycle engine serves both families; these DTOs are the thin
//! field-mapping layer that keeps the historical payload vocabulary
//! (`issuing_agency` for licenses, `property_name` and
//! `technical_responsible` for certificates) on the outside.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    Artifact, ArtifactDraft, ArtifactId, ArtifactPatch, ArtifactStatus, Condition, ConditionDraft,
    ConditionId, ConditionStatus, KindDetail, KindDetailPatch,
};

/// Condition payload shared by both kinds, for creation and for
/// replace-set updates.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsible: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ConditionStatus,
    #[serde(default)]
    pub completion_notes: Option<String>,
    #[serde(default)]
    pub completed_at: Option<NaiveDate>,
}

impl From<ConditionPayload> for ConditionDraft {
    fn from(payload: ConditionPayload) -> Self {
        ConditionDraft {
            title: payload.title,
            description: payload.description,
            responsible: payload.responsible,
            due_date: payload.due_date,
            status: payload.status,
            completion_notes: payload.completion_notes,
            completed_at: payload.completed_at,
        }
    }
}

/// Condition representation returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionView {
    pub id: ConditionId,
    pub title: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ConditionStatus,
    pub completion_notes: Option<String>,
    pub completed_at: Option<NaiveDate>,
}

impl ConditionView {
    fn from_domain(condition: &Condition) -> Self {
        Self {
            id: condition.id,
            title: condition.title.clone(),
            description: condition.description.clone(),
            responsible: condition.responsible.clone(),
            due_date: condition.due_date,
            status: condition.status,
            completion_notes: condition.completion_notes.clone(),
            completed_at: condition.completed_at,
        }
    }
}

/// License creation payload.
#[derive(Debug, Deserialize)]
pub struct LicenseCreate {
    pub name: String,
    pub issuing_agency: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: ArtifactStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionPayload>,
}

impl From<LicenseCreate> for ArtifactDraft {
    fn from(payload: LicenseCreate) -> Self {
        ArtifactDraft {
            name: payload.name,
            detail: KindDetail::License {
                issuing_agency: payload.issuing_agency,
            },
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status: payload.status,
            notes: payload.notes,
            conditions: payload.conditions.into_iter().map(Into::into).collect(),
        }
    }
}

/// License partial update; omitted fields stay as stored.
#[derive(Debug, Default, Deserialize)]
pub struct LicensePatchPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issuing_agency: Option<String>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ArtifactStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conditions: Option<Vec<ConditionPayload>>,
}

impl From<LicensePatchPayload> for ArtifactPatch {
    fn from(payload: LicensePatchPayload) -> Self {
        ArtifactPatch {
            name: payload.name,
            detail: payload.issuing_agency.map(|issuing_agency| {
                KindDetailPatch::License {
                    issuing_agency: Some(issuing_agency),
                }
            }),
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status: payload.status,
            notes: payload.notes,
            conditions: payload
                .conditions
                .map(|set| set.into_iter().map(Into::into).collect()),
        }
    }
}

/// Certificate creation payload.
#[derive(Debug, Deserialize)]
pub struct CertificateCreate {
    pub property_name: String,
    #[serde(default)]
    pub property_address: Option<String>,
    #[serde(default)]
    pub technical_responsible: Option<String>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: ArtifactStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionPayload>,
}

impl From<CertificateCreate> for ArtifactDraft {
    fn from(payload: CertificateCreate) -> Self {
        ArtifactDraft {
            name: payload.property_name,
            detail: KindDetail::Certificate {
                property_address: payload.property_address,
                technical_responsible: payload.technical_responsible,
            },
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status: payload.status,
            notes: payload.notes,
            conditions: payload.conditions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Certificate partial update; omitted fields stay as stored.
#[derive(Debug, Default, Deserialize)]
pub struct CertificatePatchPayload {
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub property_address: Option<String>,
    #[serde(default)]
    pub technical_responsible: Option<String>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ArtifactStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub conditions: Option<Vec<ConditionPayload>>,
}

impl From<CertificatePatchPayload> for ArtifactPatch {
    fn from(payload: CertificatePatchPayload) -> Self {
        let detail = if payload.property_address.is_some()
            || payload.technical_responsible.is_some()
        {
            Some(KindDetailPatch::Certificate {
                property_address: payload.property_address,
                technical_responsible: payload.technical_responsible,
            })
        } else {
            None
        };

        ArtifactPatch {
            name: payload.property_name,
            detail,
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            status: payload.status,
            notes: payload.notes,
            conditions: payload
                .conditions
                .map(|set| set.into_iter().map(Into::into).collect()),
        }
    }
}

/// License representation returned to clients.
#[derive(Debug, Serialize)]
pub struct LicenseView {
    pub id: ArtifactId,
    pub name: String,
    pub issuing_agency: String,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub status: ArtifactStatus,
    pub notes: Option<String>,
    pub document_path: Option<String>,
    pub conditions: Vec<ConditionView>,
}

/// Certificate representation returned to clients.
#[derive(Debug, Serialize)]
pub struct CertificateView {
    pub id: ArtifactId,
    pub property_name: String,
    pub property_address: Option<String>,
    pub technical_responsible: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub status: ArtifactStatus,
    pub notes: Option<String>,
    pub document_path: Option<String>,
    pub conditions: Vec<ConditionView>,
}

/// Kind-dispatched response body; serializes as the flat per-kind
/// shape without a discriminator field.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ArtifactView {
    License(LicenseView),
    Certificate(CertificateView),
}

impl ArtifactView {
    pub fn from_domain(artifact: &Artifact) -> Self {
        let conditions = artifact
            .conditions
            .iter()
            .map(ConditionView::from_domain)
            .collect();

        match &artifact.detail {
            KindDetail::License { issuing_agency } => ArtifactView::License(LicenseView {
                id: artifact.id,
                name: artifact.name.clone(),
                issuing_agency: issuing_agency.clone(),
                issue_date: artifact.issue_date,
                expiry_date: artifact.expiry_date,
                status: artifact.status,
                notes: artifact.notes.clone(),
                document_path: artifact.document_path.clone(),
                conditions,
            }),
            KindDetail::Certificate {
                property_address,
                technical_responsible,
            } => ArtifactView::Certificate(CertificateView {
                id: artifact.id,
                property_name: artifact.name.clone(),
                property_address: property_address.clone(),
                technical_responsible: technical_responsible.clone(),
                issue_date: artifact.issue_date,
                expiry_date: artifact.expiry_date,
                status: artifact.status,
                notes: artifact.notes.clone(),
                document_path: artifact.document_path.clone(),
                conditions,
            }),
        }
    }
}

/// Expiry-warning request body.
#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub emails: Vec<String>,
    pub days_left: i64,
}
