//! CSV table publishing.
//!
//! Each table is encoded into a temporary file inside the output directory
//! and then renamed over its final name. Readers see either the previous
//! complete file or the new complete file, never a partial one, and a
//! concurrent creator of the same file is simply replaced.

use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::WriteError;
use crate::tables::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Replaced,
}

/// Result of publishing one table.
#[derive(Debug, Clone)]
pub struct Published {
    pub path: PathBuf,
    pub outcome: PublishOutcome,
    pub rows: usize,
    /// SHA-256 of the file contents, hex encoded.
    pub digest: String,
}

/// Encode header + rows as CSV.
pub fn encode_table(table: &Table) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table.header())?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write `table` to `dir/<file name>`, replacing any existing file.
pub fn publish_table(dir: &Path, table: &Table) -> Result<Published, WriteError> {
    let path = dir.join(table.kind.file_name());
    let bytes = encode_table(table).map_err(|source| WriteError::Csv {
        path: path.clone(),
        source,
    })?;
    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.clone(),
        source,
    };

    let outcome = if path.exists() {
        PublishOutcome::Replaced
    } else {
        PublishOutcome::Created
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(&path).map_err(|e| io_err(e.error))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(Published {
        path,
        outcome,
        rows: table.len(),
        digest: format!("{:x}", hasher.finalize()),
    })
}
