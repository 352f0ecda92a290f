use chrono::{Duration, NaiveDate};

use super::domain::{Artifact, ArtifactStatus, StatusParseError};

/// Listing filter parameters as supplied by the caller. The status is
/// kept as the raw string so an unrecognized value surfaces as an
/// invalid-argument failure instead of being dropped at the edge.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub days_until_expiry: Option<i64>,
}

/// Apply the status and expiry-horizon filters (logical AND), then
/// order by ascending expiry date. The horizon keeps artifacts with
/// `expiry_date <= today + days`; a zero or negative horizon therefore
/// selects artifacts already at or past expiry. `Vec::sort_by` is
/// stable, so equal expiry dates keep their incoming relative order.
pub fn apply(
    mut artifacts: Vec<Artifact>,
    query: &ListQuery,
    today: NaiveDate,
) -> Result<Vec<Artifact>, StatusParseError> {
    if let Some(raw) = query.status.as_deref() {
        let wanted: ArtifactStatus = raw.parse()?;
        artifacts.retain(|artifact| artifact.status == wanted);
    }

    if let Some(days) = query.days_until_expiry {
        let horizon = today + Duration::days(days);
        artifacts.retain(|artifact| artifact.expiry_date <= horizon);
    }

    artifacts.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date));
    Ok(artifacts)
}
