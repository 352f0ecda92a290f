//! Fixed-layout expiry reports.
//!
//! The generator walks the caller-supplied entries in order (it never
//! filters or re-sorts) and writes a title header plus one bordered
//! block per entry through a [`DocumentSink`]. The sink mirrors the
//! external renderer contract so tests and the boundary layer can
//! substitute their own document backends.

use std::fs;
use std::path::PathBuf;

use crate::registry::domain::Artifact;

const BLOCKS_PER_PAGE: usize = 8;
const PAGE_WIDTH: usize = 72;

/// One row of the compliance report, already filtered and ordered by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub issuing_agency: String,
    pub expiry_date: String,
    pub status: String,
}

impl ReportEntry {
    pub fn from_artifact(artifact: &Artifact) -> Self {
        Self {
            name: artifact.name.clone(),
            issuing_agency: artifact.detail.authority().to_string(),
            expiry_date: artifact.expiry_date.to_string(),
            status: artifact.status.label().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("nothing to report")]
    EmptyInput,
    #[error("unable to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Document assembly contract mirroring the external renderer:
/// a header, a sequence of blocks, one save.
pub trait DocumentSink {
    fn add_header(&mut self, text: &str);
    fn add_block(&mut self, text: &str);
    fn save(&mut self) -> Result<PathBuf, ReportError>;
}

/// Render the report into `sink` and save it. Entries come out in
/// input order; an empty sequence is an error the boundary maps to
/// "nothing to report".
pub fn generate<S: DocumentSink>(
    title: &str,
    entries: &[ReportEntry],
    sink: &mut S,
) -> Result<PathBuf, ReportError> {
    if entries.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    sink.add_header(title);
    for entry in entries {
        let block = format!(
            "Name: {}\nIssuing agency: {}\nExpiry date: {}\nStatus: {}",
            entry.name, entry.issuing_agency, entry.expiry_date, entry.status
        );
        sink.add_block(&block);
    }

    sink.save()
}

/// Plain-text sink producing a paginated document with a centered
/// title and a border around each block.
#[derive(Debug)]
pub struct TextDocument {
    path: PathBuf,
    header: Option<String>,
    blocks: Vec<String>,
}

impl TextDocument {
    pub fn new(directory: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            path: directory.into().join(file_name),
            header: None,
            blocks: Vec::new(),
        }
    }
}

impl DocumentSink for TextDocument {
    fn add_header(&mut self, text: &str) {
        self.header = Some(text.to_string());
    }

    fn add_block(&mut self, text: &str) {
        self.blocks.push(text.to_string());
    }

    fn save(&mut self) -> Result<PathBuf, ReportError> {
        let mut out = String::new();

        for (page, chunk) in self.blocks.chunks(BLOCKS_PER_PAGE).enumerate() {
            if page == 0 {
                if let Some(header) = &self.header {
                    out.push_str(&format!("{:^width$}\n\n", header, width = PAGE_WIDTH));
                }
            } else {
                // Form feed between pages.
                out.push_str("\u{c}\n");
            }

            for block in chunk {
                out.push_str(&bordered(block));
                out.push('\n');
            }

            let footer = format!("Page {}", page + 1);
            out.push_str(&format!("{:^width$}\n", footer, width = PAGE_WIDTH));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, out)?;
        Ok(self.path.clone())
    }
}

fn bordered(block: &str) -> String {
    let rule = format!("+{}+\n", "-".repeat(PAGE_WIDTH - 2));
    let mut out = rule.clone();
    for line in block.lines() {
        out.push_str(&format!("| {:width$} |\n", line, width = PAGE_WIDTH - 4));
    }
    out.push_str(&rule);
    out
}
