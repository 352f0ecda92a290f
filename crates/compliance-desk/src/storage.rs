//! Local document persistence for uploaded artifact files and rendered
//! reports.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::registry::domain::ArtifactKind;

/// Storage buckets, one directory per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCategory {
    Licenses,
    Certificates,
    Reports,
}

impl StorageCategory {
    pub const fn directory(self) -> &'static str {
        match self {
            StorageCategory::Licenses => "licenses",
            StorageCategory::Certificates => "certificates",
            StorageCategory::Reports => "reports",
        }
    }

    pub const fn for_kind(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::License => StorageCategory::Licenses,
            ArtifactKind::Certificate => StorageCategory::Certificates,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to persist document: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed document store rooted at the configured directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    base_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Persist `bytes` under the category directory with a random file
    /// name that keeps the original extension.
    pub fn save(
        &self,
        bytes: &[u8],
        category: StorageCategory,
        original_name: &str,
    ) -> Result<PathBuf, StorageError> {
        let directory = self.base_dir.join(category.directory());
        fs::create_dir_all(&directory)?;

        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("pdf");
        let file_name = format!("{}.{extension}", Uuid::new_v4().simple());

        let destination = directory.join(file_name);
        fs::write(&destination, bytes)?;
        Ok(destination)
    }

    /// Directory rendered reports are written to.
    pub fn report_dir(&self) -> PathBuf {
        self.base_dir.join(StorageCategory::Reports.directory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_keeps_extension_and_separates_categories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DocumentStore::new(dir.path());

        let saved = store
            .save(b"%PDF-1.4", StorageCategory::Licenses, "operating.pdf")
            .expect("document saved");

        assert!(saved.starts_with(dir.path().join("licenses")));
        assert_eq!(saved.extension().and_then(|ext| ext.to_str()), Some("pdf"));
        assert_eq!(fs::read(&saved).expect("readable"), b"%PDF-1.4");
    }

    #[test]
    fn category_follows_kind() {
        assert_eq!(
            StorageCategory::for_kind(ArtifactKind::License),
            StorageCategory::Licenses
        );
        assert_eq!(
            StorageCategory::for_kind(ArtifactKind::Certificate),
            StorageCategory::Certificates
        );
    }
}
