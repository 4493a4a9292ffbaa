use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};

pub async fn connect(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Remove a store and its WAL side files so the next load starts empty.
pub fn reset_store(db_path: &Path) -> std::io::Result<()> {
    for path in store_files(db_path) {
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn store_files(db_path: &Path) -> Vec<PathBuf> {
    let mut files = vec![db_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

/// Open an existing store without creating it.
pub async fn open_existing(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!("Graph store not found: {}", db_path.display());
    }
    Ok(connect(db_path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_missing_store_is_ok() {
        let tmp = TempDir::new().unwrap();
        reset_store(&tmp.path().join("graph.sqlite")).unwrap();
    }

    #[test]
    fn test_reset_removes_side_files() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("graph.sqlite");
        for path in store_files(&db) {
            std::fs::write(&path, "x").unwrap();
        }
        reset_store(&db).unwrap();
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
