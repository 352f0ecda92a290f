use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use compliance_desk::error::AppError;
use compliance_desk::notify::SmtpMailer;
use compliance_desk::registry::{
    ArtifactDraft, ArtifactKind, ArtifactService, ArtifactStatus, ConditionDraft, ConditionStatus,
    InMemoryArtifactStore, KindDetail, ListQuery,
};
use compliance_desk::report::{self, ReportEntry, TextDocument};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reference date for the run (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Expiry horizon in days for the listing and the report.
    #[arg(long, default_value_t = 30)]
    pub(crate) days_until_expiry: i64,
    /// Directory for demo output documents.
    #[arg(long, default_value = "uploads")]
    pub(crate) storage_dir: PathBuf,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        days_until_expiry,
        storage_dir,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("Facility compliance demo (reference date {today})");

    let repository = Arc::new(InMemoryArtifactStore::default());
    let mailer = Arc::new(SmtpMailer::unconfigured());
    let service = ArtifactService::new(repository, mailer);

    seed_artifacts(&service, today)?;

    let query = ListQuery {
        status: None,
        days_until_expiry: Some(days_until_expiry),
    };
    let licenses = service.list(ArtifactKind::License, &query, today)?;
    println!(
        "\nLicenses expiring within {days_until_expiry} days ({} of them):",
        licenses.len()
    );
    for license in &licenses {
        println!(
            "- #{} {} | expires {} | status {}",
            license.id,
            license.name,
            license.expiry_date,
            license.status.label()
        );
        for condition in &license.conditions {
            println!(
                "    condition '{}' -> {}",
                condition.title,
                condition.status.label()
            );
        }
    }

    let certificates = service.list(ArtifactKind::Certificate, &query, today)?;
    println!(
        "\nCertificates expiring within {days_until_expiry} days ({} of them):",
        certificates.len()
    );
    for certificate in &certificates {
        println!(
            "- #{} {} | expires {} | status {}",
            certificate.id,
            certificate.name,
            certificate.expiry_date,
            certificate.status.label()
        );
    }

    let summary = service.dashboard(today)?;
    println!("\nDashboard:");
    println!(
        "- licenses: {} total, {} expiring soon",
        summary.licenses_total, summary.licenses_expiring_soon
    );
    println!(
        "- certificates: {} total, {} expiring soon",
        summary.certificates_total, summary.certificates_expiring_soon
    );

    if let Some(first) = licenses.first() {
        let days_left = (first.expiry_date - today).num_days();
        service.notify_expiry(
            ArtifactKind::License,
            first.id,
            &["ops@example.com".to_string()],
            days_left,
        )?;
        println!(
            "\nExpiry warning for '{}' dispatched (transport unconfigured, so this was a silent no-op)",
            first.name
        );
    }

    let entries: Vec<ReportEntry> = licenses.iter().map(ReportEntry::from_artifact).collect();
    let file_name = format!("licenses_{today}.txt");
    let mut document = TextDocument::new(storage_dir.join("reports"), &file_name);
    let path = report::generate("License Expiry Report", &entries, &mut document)?;
    println!("\nReport written to {}", path.display());

    Ok(())
}

fn seed_artifacts(
    service: &ArtifactService<InMemoryArtifactStore, SmtpMailer>,
    today: NaiveDate,
) -> Result<(), AppError> {
    let licenses = [
        (
            "Operating License, Unit 12",
            today + Duration::days(20),
            ArtifactStatus::Active,
            vec![
                ConditionDraft {
                    title: "Quarterly effluent monitoring".to_string(),
                    description: Some("Sample discharge point P-3".to_string()),
                    responsible: Some("EHS team".to_string()),
                    due_date: Some(today - Duration::days(3)),
                    status: ConditionStatus::Open,
                    completion_notes: None,
                    completed_at: None,
                },
                ConditionDraft {
                    title: "Riparian buffer replanting".to_string(),
                    description: None,
                    responsible: Some("Grounds contractor".to_string()),
                    due_date: Some(today + Duration::days(45)),
                    status: ConditionStatus::InProgress,
                    completion_notes: None,
                    completed_at: None,
                },
            ],
        ),
        (
            "Water Use Permit, Well 2",
            today + Duration::days(180),
            ArtifactStatus::Active,
            Vec::new(),
        ),
    ];

    for (name, expiry, status, conditions) in licenses {
        service.create(ArtifactDraft {
            name: name.to_string(),
            detail: KindDetail::License {
                issuing_agency: "State Environmental Agency".to_string(),
            },
            issue_date: Some(today - Duration::days(300)),
            expiry_date: expiry,
            status,
            notes: None,
            conditions,
        })?;
    }

    service.create(ArtifactDraft {
        name: "Warehouse B".to_string(),
        detail: KindDetail::Certificate {
            property_address: Some("Industrial Ave 500".to_string()),
            technical_responsible: Some("R. Meyer".to_string()),
        },
        issue_date: Some(today - Duration::days(400)),
        expiry_date: today + Duration::days(10),
        status: ArtifactStatus::Pending,
        notes: Some("Renewal inspection scheduled".to_string()),
        conditions: vec![ConditionDraft {
            title: "Hydrant pressure test".to_string(),
            description: None,
            responsible: Some("Facilities".to_string()),
            due_date: Some(today - Duration::days(1)),
            status: ConditionStatus::Open,
            completion_notes: None,
            completed_at: None,
        }],
    })?;

    Ok(())
}
