//! Bulk load of the CSV tables into the graph store.
//!
//! The store is rebuilt from scratch: any existing database is removed, the
//! schema is created, and the tables are copied in node-first order, one
//! transaction per table. Constraint failures surface as
//! [`LoadError::SchemaViolation`].

use anyhow::{Context, Result};
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

use crate::db;
use crate::error::LoadError;
use crate::migrate::{create_schema, graph_columns};
use crate::tables::TableKind;

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub tables: Vec<(TableKind, u64)>,
}

impl LoadSummary {
    pub fn rows(&self, kind: TableKind) -> u64 {
        self.tables
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn nodes(&self) -> u64 {
        self.tables
            .iter()
            .filter(|(k, _)| !k.is_edge())
            .map(|(_, n)| n)
            .sum()
    }

    pub fn edges(&self) -> u64 {
        self.tables
            .iter()
            .filter(|(k, _)| k.is_edge())
            .map(|(_, n)| n)
            .sum()
    }
}

/// Copy every table file from `data_dir` into an already-migrated store.
pub async fn load_tables(pool: &SqlitePool, data_dir: &Path) -> Result<LoadSummary, LoadError> {
    let mut summary = LoadSummary::default();
    for kind in TableKind::ALL {
        let rows = load_table(pool, data_dir, kind).await?;
        info!(table = kind.graph_table(), rows, "table loaded");
        summary.tables.push((kind, rows));
    }
    Ok(summary)
}

async fn load_table(pool: &SqlitePool, data_dir: &Path, kind: TableKind) -> Result<u64, LoadError> {
    let path = data_dir.join(kind.file_name());
    if !path.exists() {
        return Err(LoadError::MissingFile(path));
    }
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(&path).map_err(csv_err)?;
    let found: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if found != kind.header() {
        return Err(LoadError::HeaderMismatch {
            path: path.clone(),
            expected: kind.header().iter().map(|s| s.to_string()).collect(),
            found,
        });
    }

    let columns = graph_columns(kind);
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        kind.graph_table(),
        columns.join(", "),
        vec!["?"; columns.len()].join(", ")
    );

    let mut tx = pool.begin().await?;
    let mut rows = 0u64;
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let mut query = sqlx::query(&sql);
        for value in record.iter() {
            query = query.bind(value);
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(kind, e))?;
        rows += 1;
    }
    tx.commit().await?;

    Ok(rows)
}

fn classify(kind: TableKind, err: sqlx::Error) -> LoadError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(
            db_err.kind(),
            ErrorKind::ForeignKeyViolation | ErrorKind::UniqueViolation | ErrorKind::NotNullViolation
        ) {
            return LoadError::SchemaViolation {
                table: kind.graph_table().to_string(),
                message: db_err.message().to_string(),
            };
        }
    }
    LoadError::Database(err)
}

/// Recreate the store at `db_path` and load all tables from `data_dir`.
pub async fn run_load(data_dir: &Path, db_path: &Path) -> Result<LoadSummary> {
    db::reset_store(db_path)
        .with_context(|| format!("Failed to reset graph store: {}", db_path.display()))?;

    let pool = db::connect(db_path).await?;
    create_schema(&pool).await?;
    let result = load_tables(&pool, data_dir).await;
    pool.close().await;
    let summary = result?;

    println!("load {}", data_dir.display());
    for (kind, rows) in &summary.tables {
        println!("  {:<14} {:>6} rows", kind.graph_table(), rows);
    }
    println!("  nodes: {}", summary.nodes());
    println!("  edges: {}", summary.edges());
    println!("  store: {}", db_path.display());
    println!("ok");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_tables(dir: &Path, overrides: &[(TableKind, &str)]) {
        for kind in TableKind::ALL {
            let body = overrides
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, b)| b.to_string())
                .unwrap_or_default();
            let contents = format!("{}\n{}", kind.header().join(","), body);
            std::fs::write(dir.join(kind.file_name()), contents).unwrap();
        }
    }

    #[tokio::test]
    async fn test_loads_consistent_tables() {
        let tmp = TempDir::new().unwrap();
        write_tables(
            tmp.path(),
            &[
                (TableKind::Document, "k,graph,a.qmd,https://h/a.html,A,,Jane,x,\n"),
                (TableKind::Category, "x\n"),
                (TableKind::Author, "Jane\n"),
                (TableKind::Source, "http://u\n"),
                (TableKind::HasCategory, "k,x\n"),
                (TableKind::AuthoredBy, "k,Jane\n"),
                (TableKind::HasSource, "k,http://u,docs\n"),
            ],
        );

        let db_path = tmp.path().join("graph.sqlite");
        let summary = run_load(tmp.path(), &db_path).await.unwrap();
        assert_eq!(summary.nodes(), 4);
        assert_eq!(summary.edges(), 3);

        let pool = db::connect(&db_path).await.unwrap();
        let name: String = sqlx::query_scalar("SELECT sourceName FROM has_source")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, "docs");
        pool.close().await;
    }

    #[tokio::test]
    async fn test_dangling_edge_is_schema_violation() {
        let tmp = TempDir::new().unwrap();
        write_tables(
            tmp.path(),
            &[
                (TableKind::Document, "k,graph,a.qmd,https://h/a.html,A,,,,\n"),
                (TableKind::AuthoredBy, "k,Nobody\n"),
            ],
        );

        let pool = db::connect(&tmp.path().join("graph.sqlite")).await.unwrap();
        create_schema(&pool).await.unwrap();
        let err = load_tables(&pool, tmp.path()).await.unwrap_err();
        assert!(
            matches!(err, LoadError::SchemaViolation { ref table, .. } if table == "authored_by"),
            "unexpected error: {}",
            err
        );
        pool.close().await;
    }

    #[tokio::test]
    async fn test_duplicate_node_key_is_schema_violation() {
        let tmp = TempDir::new().unwrap();
        write_tables(tmp.path(), &[(TableKind::Category, "x\nx\n")]);

        let pool = db::connect(&tmp.path().join("graph.sqlite")).await.unwrap();
        create_schema(&pool).await.unwrap();
        let err = load_tables(&pool, tmp.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::SchemaViolation { .. }));
        pool.close().await;
    }

    #[tokio::test]
    async fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect(&tmp.path().join("graph.sqlite")).await.unwrap();
        create_schema(&pool).await.unwrap();
        let err = load_tables(&pool, tmp.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingFile(_)));
        pool.close().await;
    }

    #[tokio::test]
    async fn test_header_mismatch() {
        let tmp = TempDir::new().unwrap();
        write_tables(tmp.path(), &[]);
        std::fs::write(tmp.path().join(TableKind::Document.file_name()), "Wrong\n").unwrap();

        let pool = db::connect(&tmp.path().join("graph.sqlite")).await.unwrap();
        create_schema(&pool).await.unwrap();
        let err = load_tables(&pool, tmp.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::HeaderMismatch { .. }));
        pool.close().await;
    }

    #[tokio::test]
    async fn test_reload_replaces_store() {
        let tmp = TempDir::new().unwrap();
        write_tables(tmp.path(), &[(TableKind::Category, "x\n")]);
        let db_path = tmp.path().join("graph.sqlite");

        run_load(tmp.path(), &db_path).await.unwrap();
        let summary = run_load(tmp.path(), &db_path).await.unwrap();
        assert_eq!(summary.rows(TableKind::Category), 1);
    }
}
