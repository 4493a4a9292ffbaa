//! Extraction pipeline orchestration.
//!
//! Coordinates a full rebuild: discovery → front-matter parsing →
//! normalization → table building → CSV publishing. Per-document failures
//! are logged and collected in the run report; only output failures abort
//! the run.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{Config, SiteConfig};
use crate::connector_fs;
use crate::error::{DocumentError, WriteError};
use crate::frontmatter::parse_front_matter;
use crate::models::{DocumentFormat, NormalizedDocument};
use crate::normalize::Normalizer;
use crate::tables::{GraphTables, TableBuilder};
use crate::writer::{publish_table, Published};

/// Why a candidate document produced no rows.
#[derive(Debug)]
pub enum SkipReason {
    /// No delimiter block, or no qualifying raw cell.
    NoMetadata,
    Failed(DocumentError),
}

#[derive(Debug)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// In-memory result of processing the whole corpus.
#[derive(Debug)]
pub struct Extraction {
    pub tables: GraphTables,
    pub scanned: usize,
    pub documents: usize,
    pub skipped: Vec<SkippedDocument>,
}

impl Extraction {
    pub fn failed(&self) -> impl Iterator<Item = &SkippedDocument> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Failed(_)))
    }
}

/// Read, parse, and normalize one document. `Ok(None)` means the document
/// carries no front-matter.
pub fn process_document(
    normalizer: &Normalizer,
    path: &Path,
) -> Result<Option<NormalizedDocument>, DocumentError> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))?;

    let contents = std::fs::read_to_string(path)?;
    match parse_front_matter(&contents, format)? {
        Some(front) => normalizer.normalize(&front, path).map(Some),
        None => Ok(None),
    }
}

/// Process every path and build the table set. Documents are handled in
/// the order given.
pub fn extract_tables<I, P>(paths: I, site: &SiteConfig) -> Result<Extraction>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let normalizer = Normalizer::new(site)?;
    let mut builder = TableBuilder::new();
    let mut skipped = Vec::new();
    let mut scanned = 0usize;

    for path in paths {
        let path = path.as_ref();
        scanned += 1;

        let result = process_document(&normalizer, path)
            .and_then(|doc| doc.map(|d| builder.push(&d)).transpose());

        match result {
            Ok(Some(())) => {
                debug!(path = %path.display(), "document extracted");
            }
            Ok(None) => {
                info!(path = %path.display(), "no front-matter, skipping");
                skipped.push(SkippedDocument {
                    path: path.to_path_buf(),
                    reason: SkipReason::NoMetadata,
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping document");
                skipped.push(SkippedDocument {
                    path: path.to_path_buf(),
                    reason: SkipReason::Failed(e),
                });
            }
        }
    }

    let documents = builder.document_count();
    Ok(Extraction {
        tables: builder.finish(),
        scanned,
        documents,
        skipped,
    })
}

/// Publish every table into `dir`. Stops at the first failure.
pub fn write_tables(dir: &Path, tables: &GraphTables) -> Result<Vec<Published>, WriteError> {
    let mut published = Vec::new();
    for table in tables.iter() {
        let result = publish_table(dir, table)?;
        info!(
            file = %result.path.display(),
            rows = result.rows,
            outcome = ?result.outcome,
            "table written"
        );
        published.push(result);
    }
    Ok(published)
}

/// Summary of an `extract` run.
#[derive(Debug)]
pub struct ExtractReport {
    pub extraction: Extraction,
    pub published: Vec<Published>,
}

/// Scan `input`, extract all tables, and write them to `output`.
pub fn run_extract(config: &Config, input: &Path, output: &Path) -> Result<ExtractReport> {
    let paths = connector_fs::scan_documents(input, &config.discovery)?;
    info!(input = %input.display(), candidates = paths.len(), "scanned input");

    let extraction = extract_tables(&paths, &config.site)?;

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    let published = write_tables(output, &extraction.tables)?;

    println!("extract {}", input.display());
    println!("  scanned: {} files", extraction.scanned);
    println!("  documents: {}", extraction.documents);
    println!("  skipped: {}", extraction.skipped.len());
    for skip in extraction.failed() {
        if let SkipReason::Failed(e) = &skip.reason {
            println!("    {}: {}", skip.path.display(), e);
        }
    }
    for p in &published {
        println!(
            "  {:<26} {:>6} rows  sha256:{}",
            p.path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            p.rows,
            &p.digest[..12]
        );
    }
    println!("ok");

    Ok(ExtractReport {
        extraction,
        published,
    })
}
