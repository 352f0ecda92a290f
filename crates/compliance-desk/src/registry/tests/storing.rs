use super::common::*;
use crate::registry::domain::{ArtifactKind, ArtifactPatch, ArtifactStatus, ConditionStatus};
use crate::registry::repository::{ArtifactRepository, RepositoryError};
use crate::registry::store::InMemoryArtifactStore;

#[test]
fn create_assigns_independent_id_sequences_per_kind() {
    let store = InMemoryArtifactStore::default();

    let license = store
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");
    let certificate = store
        .create(certificate_draft("Warehouse B", date(2024, 3, 31)))
        .expect("certificate created");

    assert_eq!(license.id, 1);
    assert_eq!(certificate.id, 1);
}

#[test]
fn fetch_is_kind_scoped() {
    let store = InMemoryArtifactStore::default();
    let license = store
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");

    let as_certificate = store
        .fetch(ArtifactKind::Certificate, license.id)
        .expect("fetch succeeds");
    assert!(as_certificate.is_none(), "license id must not resolve a certificate");

    let as_license = store
        .fetch(ArtifactKind::License, license.id)
        .expect("fetch succeeds");
    assert_eq!(as_license.expect("present").name, "Operating License");
}

#[test]
fn update_touches_only_present_fields() {
    let store = InMemoryArtifactStore::default();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.notes = Some("initial survey pending".to_string());
    let license = store.create(draft).expect("license created");

    let patch = ArtifactPatch {
        status: Some(ArtifactStatus::Active),
        ..ArtifactPatch::default()
    };
    let updated = store
        .update(ArtifactKind::License, license.id, patch)
        .expect("update succeeds");

    assert_eq!(updated.status, ArtifactStatus::Active);
    assert_eq!(updated.name, "Operating License");
    assert_eq!(updated.expiry_date, date(2024, 6, 30));
    assert_eq!(updated.notes.as_deref(), Some("initial survey pending"));
}

#[test]
fn update_replaces_the_whole_condition_set() {
    let store = InMemoryArtifactStore::default();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![
        condition("Soil survey", Some(date(2024, 2, 1)), ConditionStatus::Open),
        condition("Noise report", None, ConditionStatus::InProgress),
    ];
    let license = store.create(draft).expect("license created");
    let original_ids: Vec<_> = license.conditions.iter().map(|c| c.id).collect();
    assert_eq!(original_ids.len(), 2);

    let patch = ArtifactPatch {
        conditions: Some(vec![condition(
            "Groundwater monitoring",
            Some(date(2024, 5, 1)),
            ConditionStatus::Open,
        )]),
        ..ArtifactPatch::default()
    };
    let updated = store
        .update(ArtifactKind::License, license.id, patch)
        .expect("update succeeds");

    assert_eq!(updated.conditions.len(), 1, "no merge with the prior set");
    assert_eq!(updated.conditions[0].title, "Groundwater monitoring");
    assert!(
        !original_ids.contains(&updated.conditions[0].id),
        "replacement rows get fresh identities"
    );
}

#[test]
fn update_without_conditions_keeps_the_stored_set() {
    let store = InMemoryArtifactStore::default();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 2, 1)),
        ConditionStatus::Open,
    )];
    let license = store.create(draft).expect("license created");

    let patch = ArtifactPatch {
        name: Some("Operating License (renewed)".to_string()),
        ..ArtifactPatch::default()
    };
    let updated = store
        .update(ArtifactKind::License, license.id, patch)
        .expect("update succeeds");

    assert_eq!(updated.conditions.len(), 1);
    assert_eq!(updated.conditions[0].title, "Soil survey");
}

#[test]
fn remove_cascades_and_missing_ids_surface_not_found() {
    let store = InMemoryArtifactStore::default();
    let mut draft = license_draft("Operating License", date(2024, 6, 30));
    draft.conditions = vec![condition(
        "Soil survey",
        Some(date(2024, 2, 1)),
        ConditionStatus::Open,
    )];
    let license = store.create(draft).expect("license created");

    store
        .remove(ArtifactKind::License, license.id)
        .expect("remove succeeds");

    let gone = store
        .fetch(ArtifactKind::License, license.id)
        .expect("fetch succeeds");
    assert!(gone.is_none(), "artifact and conditions are gone together");

    match store.remove(ArtifactKind::License, license.id) {
        Err(RepositoryError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    match store.update(
        ArtifactKind::License,
        license.id,
        ArtifactPatch::default(),
    ) {
        Err(RepositoryError::NotFound) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn list_returns_only_the_requested_kind_in_insertion_order() {
    let store = InMemoryArtifactStore::default();
    store
        .create(license_draft("Permit B", date(2024, 6, 30)))
        .expect("created");
    store
        .create(certificate_draft("Warehouse B", date(2024, 3, 31)))
        .expect("created");
    store
        .create(license_draft("Permit A", date(2024, 1, 31)))
        .expect("created");

    let licenses = store.list(ArtifactKind::License).expect("list succeeds");
    let names: Vec<_> = licenses.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Permit B", "Permit A"]);
}

#[test]
fn set_document_path_records_the_stored_file() {
    let store = InMemoryArtifactStore::default();
    let license = store
        .create(license_draft("Operating License", date(2024, 6, 30)))
        .expect("license created");
    assert!(license.document_path.is_none(), "never set at creation");

    let updated = store
        .set_document_path(
            ArtifactKind::License,
            license.id,
            "uploads/licenses/abc123.pdf".to_string(),
        )
        .expect("path recorded");
    assert_eq!(
        updated.document_path.as_deref(),
        Some("uploads/licenses/abc123.pdf")
    );
}
