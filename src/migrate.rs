//! Fixed node/edge schema of the graph store.
//!
//! Node tables are keyed by their identity column; edge tables reference
//! both endpoints with enforced foreign keys, so an edge whose endpoint is
//! missing from its node table is rejected at insert time.

use sqlx::SqlitePool;

use crate::tables::TableKind;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS Document (
        FileIndex TEXT PRIMARY KEY NOT NULL,
        DocSite TEXT NOT NULL,
        FileName TEXT NOT NULL,
        URL TEXT NOT NULL,
        Title TEXT NOT NULL,
        Description TEXT NOT NULL,
        Author TEXT NOT NULL,
        Categories TEXT NOT NULL,
        Date TEXT NOT NULL
    )
    "#,
    "CREATE TABLE IF NOT EXISTS Category (Category TEXT PRIMARY KEY NOT NULL)",
    "CREATE TABLE IF NOT EXISTS Author (Author TEXT PRIMARY KEY NOT NULL)",
    "CREATE TABLE IF NOT EXISTS Source (LinkURL TEXT PRIMARY KEY NOT NULL)",
    r#"
    CREATE TABLE IF NOT EXISTS has_category (
        FileIndex TEXT NOT NULL REFERENCES Document(FileIndex),
        Category TEXT NOT NULL REFERENCES Category(Category)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS authored_by (
        FileIndex TEXT NOT NULL REFERENCES Document(FileIndex),
        Author TEXT NOT NULL REFERENCES Author(Author)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS has_source (
        FileIndex TEXT NOT NULL REFERENCES Document(FileIndex),
        LinkURL TEXT NOT NULL REFERENCES Source(LinkURL),
        sourceName TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_has_category_from ON has_category(FileIndex)",
    "CREATE INDEX IF NOT EXISTS idx_has_category_to ON has_category(Category)",
    "CREATE INDEX IF NOT EXISTS idx_authored_by_from ON authored_by(FileIndex)",
    "CREATE INDEX IF NOT EXISTS idx_authored_by_to ON authored_by(Author)",
    "CREATE INDEX IF NOT EXISTS idx_has_source_from ON has_source(FileIndex)",
    "CREATE INDEX IF NOT EXISTS idx_has_source_to ON has_source(LinkURL)",
];

/// Column names in the store, positionally matching the CSV header of the
/// same table.
pub fn graph_columns(kind: TableKind) -> &'static [&'static str] {
    match kind {
        TableKind::HasSource => &["FileIndex", "LinkURL", "sourceName"],
        other => other.header(),
    }
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
