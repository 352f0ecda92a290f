use super::common::*;
use crate::registry::domain::{ArtifactKind, ArtifactStatus, ConditionStatus};
use crate::registry::filter::ListQuery;
use crate::registry::repository::ArtifactRepository;

#[test]
fn listing_promotes_past_due_conditions_and_leaves_artifact_status_alone() {
    let (service, repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 1, 10));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 1, 5)),
        ConditionStatus::Open,
    )];
    let license = service.create(draft).expect("license created");

    let listed = service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 1, 6))
        .expect("list succeeds");

    assert_eq!(listed[0].conditions[0].status, ConditionStatus::Overdue);
    assert_eq!(listed[0].status, ArtifactStatus::Pending, "artifact untouched");

    let stored = repository
        .fetch(ArtifactKind::License, license.id)
        .expect("fetch succeeds")
        .expect("present");
    assert_eq!(
        stored.conditions[0].status,
        ConditionStatus::Overdue,
        "promotion is persisted, not just projected"
    );
}

#[test]
fn completed_conditions_are_never_promoted() {
    let (service, repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    let mut done = condition(
        "Soil survey",
        Some(date(2024, 1, 5)),
        ConditionStatus::Completed,
    );
    done.completed_at = Some(date(2024, 1, 4));
    draft.conditions = vec![done];
    let license = service.create(draft).expect("license created");

    service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 3, 1))
        .expect("list succeeds");

    let stored = repository
        .fetch(ArtifactKind::License, license.id)
        .expect("fetch succeeds")
        .expect("present");
    assert_eq!(stored.conditions[0].status, ConditionStatus::Completed);
}

#[test]
fn due_today_is_not_overdue() {
    let (service, _repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 1, 6)),
        ConditionStatus::Open,
    )];
    service.create(draft).expect("license created");

    let listed = service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 1, 6))
        .expect("list succeeds");

    assert_eq!(listed[0].conditions[0].status, ConditionStatus::Open);
}

#[test]
fn conditions_without_due_date_are_ignored() {
    let (service, _repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition("Noise report", None, ConditionStatus::InProgress)];
    service.create(draft).expect("license created");

    let listed = service
        .list(ArtifactKind::License, &ListQuery::default(), date(2030, 1, 1))
        .expect("list succeeds");

    assert_eq!(listed[0].conditions[0].status, ConditionStatus::InProgress);
}

#[test]
fn in_progress_conditions_are_promoted_too() {
    let (service, _repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Noise report",
        Some(date(2024, 1, 5)),
        ConditionStatus::InProgress,
    )];
    service.create(draft).expect("license created");

    let listed = service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 2, 1))
        .expect("list succeeds");

    assert_eq!(listed[0].conditions[0].status, ConditionStatus::Overdue);
}

#[test]
fn sweep_is_idempotent_across_repeated_listings() {
    let (service, repository, _mailer) = build_service();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 1, 5)),
        ConditionStatus::Open,
    )];
    service.create(draft).expect("license created");

    let first = repository.sweep_overdue(date(2024, 2, 1)).expect("sweep runs");
    assert_eq!(first, 1);
    let second = repository.sweep_overdue(date(2024, 2, 1)).expect("sweep runs");
    assert_eq!(second, 0, "re-setting the same value is a no-op");

    service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 2, 1))
        .expect("list still succeeds with zero candidates");
}

#[test]
fn sweep_spans_both_kinds() {
    let (service, repository, _mailer) = build_service();

    let mut license = license_draft("Operating License", date(2024, 6, 30));
    license.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 1, 5)),
        ConditionStatus::Open,
    )];
    service.create(license).expect("license created");

    let mut certificate = certificate_draft("Warehouse B", date(2024, 6, 30));
    certificate.conditions = vec![condition(
        "Hydrant inspection",
        Some(date(2024, 1, 2)),
        ConditionStatus::Open,
    )];
    let certificate = service.create(certificate).expect("certificate created");

    // Listing licenses still promotes the certificate's stale condition.
    service
        .list(ArtifactKind::License, &ListQuery::default(), date(2024, 2, 1))
        .expect("list succeeds");

    let stored = repository
        .fetch(ArtifactKind::Certificate, certificate.id)
        .expect("fetch succeeds")
        .expect("present");
    assert_eq!(stored.conditions[0].status, ConditionStatus::Overdue);
}
