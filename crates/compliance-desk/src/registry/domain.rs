use chrono::{Duration, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

pub type ArtifactId = i64;
pub type ConditionId = i64;

/// The two tracked artifact families. Both share one lifecycle engine;
/// only their descriptive fields differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    License,
    Certificate,
}

impl ArtifactKind {
    pub const fn label(self) -> &'static str {
        match self {
            ArtifactKind::License => "license",
            ArtifactKind::Certificate => "certificate",
        }
    }
}

/// Caller-set lifecycle status of a license or certificate. Never
/// derived from the condition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactStatus {
    Active,
    Expired,
    Suspended,
    Pending,
}

impl ArtifactStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ArtifactStatus::Active => "active",
            ArtifactStatus::Expired => "expired",
            ArtifactStatus::Suspended => "suspended",
            ArtifactStatus::Pending => "pending",
        }
    }
}

impl Default for ArtifactStatus {
    fn default() -> Self {
        ArtifactStatus::Pending
    }
}

/// Raised when a status string does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'")]
pub struct StatusParseError(pub String);

impl FromStr for ArtifactStatus {
    type Err = StatusParseError;

    // "valid" is the historical certificate vocabulary for "active".
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" | "valid" => Ok(ArtifactStatus::Active),
            "expired" => Ok(ArtifactStatus::Expired),
            "suspended" => Ok(ArtifactStatus::Suspended),
            "pending" => Ok(ArtifactStatus::Pending),
            _ => Err(StatusParseError(raw.trim().to_string())),
        }
    }
}

impl Serialize for ArtifactStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ArtifactStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Status of a single remediation obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    Open,
    InProgress,
    Completed,
    Overdue,
}

impl ConditionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ConditionStatus::Open => "open",
            ConditionStatus::InProgress => "in_progress",
            ConditionStatus::Completed => "completed",
            ConditionStatus::Overdue => "overdue",
        }
    }
}

impl Default for ConditionStatus {
    fn default() -> Self {
        ConditionStatus::Open
    }
}

/// Kind-specific descriptive fields carried alongside the shared model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindDetail {
    License {
        issuing_agency: String,
    },
    Certificate {
        property_address: Option<String>,
        technical_responsible: Option<String>,
    },
}

impl KindDetail {
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            KindDetail::License { .. } => ArtifactKind::License,
            KindDetail::Certificate { .. } => ArtifactKind::Certificate,
        }
    }

    /// The accountable party shown in reports: the issuing agency for a
    /// license, the technical responsible for a certificate.
    pub fn authority(&self) -> &str {
        match self {
            KindDetail::License { issuing_agency } => issuing_agency,
            KindDetail::Certificate {
                technical_responsible,
                ..
            } => technical_responsible.as_deref().unwrap_or("-"),
        }
    }

    fn apply(&mut self, patch: KindDetailPatch) {
        match (self, patch) {
            (
                KindDetail::License { issuing_agency },
                KindDetailPatch::License {
                    issuing_agency: Some(value),
                },
            ) => *issuing_agency = value,
            (
                KindDetail::Certificate {
                    property_address,
                    technical_responsible,
                },
                KindDetailPatch::Certificate {
                    property_address: address,
                    technical_responsible: responsible,
                },
            ) => {
                if let Some(value) = address {
                    *property_address = Some(value);
                }
                if let Some(value) = responsible {
                    *technical_responsible = Some(value);
                }
            }
            // The routers are kind-scoped, so a cross-kind patch never
            // reaches a stored artifact.
            _ => {}
        }
    }
}

/// Kind-specific side of a partial update; absent fields stay as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindDetailPatch {
    License {
        issuing_agency: Option<String>,
    },
    Certificate {
        property_address: Option<String>,
        technical_responsible: Option<String>,
    },
}

/// A tracked license or certificate together with the remediation
/// obligations it owns. Conditions never outlive their artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    pub detail: KindDetail,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub status: ArtifactStatus,
    pub notes: Option<String>,
    pub document_path: Option<String>,
    pub conditions: Vec<Condition>,
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        self.detail.kind()
    }

    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        self.expiry_date <= today + Duration::days(days)
    }

    /// Apply a partial update in place. Returns the replacement
    /// condition set, if the patch carried one, so the store can
    /// materialize it with fresh identities (replace, never merge).
    pub fn apply_patch(&mut self, patch: ArtifactPatch) -> Option<Vec<ConditionDraft>> {
        let ArtifactPatch {
            name,
            detail,
            issue_date,
            expiry_date,
            status,
            notes,
            conditions,
        } = patch;

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = detail {
            self.detail.apply(value);
        }
        if let Some(value) = issue_date {
            self.issue_date = Some(value);
        }
        if let Some(value) = expiry_date {
            self.expiry_date = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = notes {
            self.notes = Some(value);
        }

        conditions
    }
}

/// A remediation obligation attached to an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub id: ConditionId,
    pub artifact_id: ArtifactId,
    pub title: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ConditionStatus,
    pub completion_notes: Option<String>,
    pub completed_at: Option<NaiveDate>,
}

impl Condition {
    pub fn from_draft(id: ConditionId, artifact_id: ArtifactId, draft: ConditionDraft) -> Self {
        Self {
            id,
            artifact_id,
            title: draft.title,
            description: draft.description,
            responsible: draft.responsible,
            due_date: draft.due_date,
            status: draft.status,
            completion_notes: draft.completion_notes,
            completed_at: draft.completed_at,
        }
    }

    /// The overdue promotion rule: a set due date strictly before
    /// `today`, on anything not completed. Completion is sticky.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.status != ConditionStatus::Completed
            && self.due_date.is_some_and(|due| due < today)
    }
}

/// Payload for creating an artifact together with its condition set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    pub name: String,
    pub detail: KindDetail,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: NaiveDate,
    pub status: ArtifactStatus,
    pub notes: Option<String>,
    pub conditions: Vec<ConditionDraft>,
}

/// Payload for creating one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionDraft {
    pub title: String,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ConditionStatus,
    pub completion_notes: Option<String>,
    pub completed_at: Option<NaiveDate>,
}

/// Partial update for an artifact. Absent fields leave the stored value
/// unchanged; a present `conditions` list replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactPatch {
    pub name: Option<String>,
    pub detail: Option<KindDetailPatch>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: Option<ArtifactStatus>,
    pub notes: Option<String>,
    pub conditions: Option<Vec<ConditionDraft>>,
}
