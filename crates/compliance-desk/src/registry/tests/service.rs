use std::sync::Arc;

use super::common::*;
use crate::registry::domain::{ArtifactKind, ConditionStatus};
use crate::registry::filter::ListQuery;
use crate::registry::service::{ArtifactService, ServiceError};
use crate::registry::store::InMemoryArtifactStore;

#[test]
fn get_propagates_not_found() {
    let (service, _repository, _mailer) = build_service();

    match service.get(ArtifactKind::License, 99) {
        Err(err) if err.is_not_found() => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn list_rejects_unknown_status_values() {
    let (service, _repository, _mailer) = build_service();
    service
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    let query = ListQuery {
        status: Some("bogus".to_string()),
        days_until_expiry: None,
    };
    match service.list(ArtifactKind::License, &query, date(2024, 1, 1)) {
        Err(ServiceError::InvalidStatus(err)) => {
            assert_eq!(err.to_string(), "unknown status 'bogus'");
        }
        other => panic!("expected invalid status, got {other:?}"),
    }
}

#[test]
fn list_sweeps_before_filtering() {
    let (service, _repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 1, 5)),
        ConditionStatus::Open,
    )];
    service.create(draft).expect("license created");

    let listed = service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 2, 1))
        .expect("list succeeds");

    assert_eq!(listed[0].conditions[0].status, ConditionStatus::Overdue);
}

#[test]
fn notify_builds_the_expiry_template() {
    let (service, _repository, mailer) = build_service();
    let license = service
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    service
        .notify_expiry(
            ArtifactKind::License,
            license.id,
            &["ops@example.com".to_string(), "ehs@example.com".to_string()],
            15,
        )
        .expect("notification accepted");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Operating License expires in 15 day(s)");
    assert_eq!(sent[0].recipients.len(), 2);
}

#[test]
fn notify_missing_artifact_is_not_found() {
    let (service, _repository, mailer) = build_service();

    match service.notify_expiry(
        ArtifactKind::License,
        42,
        &["ops@example.com".to_string()],
        5,
    ) {
        Err(err) if err.is_not_found() => {}
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(mailer.sent().is_empty());
}

#[test]
fn notify_with_unconfigured_transport_is_a_silent_success() {
    let repository = Arc::new(InMemoryArtifactStore::default());
    let mailer = Arc::new(RecordingMailer::unconfigured());
    let service = ArtifactService::new(repository, mailer.clone());

    let license = service
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    service
        .notify_expiry(
            ArtifactKind::License,
            license.id,
            &["ops@example.com".to_string()],
            5,
        )
        .expect("no-op success");

    assert!(mailer.sent().is_empty(), "no external system contacted");
}

#[test]
fn notify_swallows_transport_failures() {
    let repository = Arc::new(InMemoryArtifactStore::default());
    let mailer = Arc::new(FailingMailer);
    let service = ArtifactService::new(repository, mailer);

    let license = service
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    service
        .notify_expiry(
            ArtifactKind::License,
            license.id,
            &["ops@example.com".to_string()],
            5,
        )
        .expect("delivery failure never surfaces");
}

#[test]
fn dashboard_counts_totals_and_expiring_soon_per_kind() {
    let (service, _repository, _mailer) = build_service();

    service
        .create(license_draft("Expiring license", date(2024, 1, 20)))
        .expect("created");
    service
        .create(license_draft("Far license", date(2025, 1, 1)))
        .expect("created");
    service
        .create(certificate_draft("Expired certificate", date(2023, 12, 1)))
        .expect("created");

    let summary = service.dashboard(date(2024, 1, 6)).expect("summary builds");
    assert_eq!(summary.licenses_total, 2);
    assert_eq!(summary.licenses_expiring_soon, 1);
    assert_eq!(summary.certificates_total, 1);
    assert_eq!(
        summary.certificates_expiring_soon, 1,
        "already expired counts as expiring"
    );
}

#[test]
fn attach_document_records_the_path() {
    let (service, _repository, _mailer) = build_service();
    let license = service
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    let updated = service
        .attach_document(
            ArtifactKind::License,
            license.id,
            "uploads/licenses/abc.pdf".to_string(),
        )
        .expect("path recorded");

    assert_eq!(updated.document_path.as_deref(), Some("uploads/licenses/abc.pdf"));
}
