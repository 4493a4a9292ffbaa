//! Graph store statistics.
//!
//! Prints node and edge counts of a loaded store, plus a per-document
//! degree summary. Used by `docgraph stats` to confirm a load produced what
//! the extract step reported.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::db;
use crate::tables::TableKind;

/// Row count of every graph table, in load order.
pub async fn table_counts(pool: &SqlitePool) -> Result<Vec<(TableKind, i64)>> {
    let mut counts = Vec::new();
    for kind in TableKind::ALL {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.graph_table()))
            .fetch_one(pool)
            .await?;
        counts.push((kind, count));
    }
    Ok(counts)
}

/// Documents with the most outgoing edges.
async fn top_documents(pool: &SqlitePool, limit: i64) -> Result<Vec<(String, String, i64)>> {
    let rows = sqlx::query(
        r#"
        SELECT d.FileIndex AS key, d.Title AS title,
            (SELECT COUNT(*) FROM has_category c WHERE c.FileIndex = d.FileIndex)
          + (SELECT COUNT(*) FROM authored_by a WHERE a.FileIndex = d.FileIndex)
          + (SELECT COUNT(*) FROM has_source s WHERE s.FileIndex = d.FileIndex) AS degree
        FROM Document d
        ORDER BY degree DESC, d.FileIndex
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("key"), row.get("title"), row.get("degree")))
        .collect())
}

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(db_path: &Path) -> Result<()> {
    let pool = db::open_existing(db_path).await?;

    let counts = table_counts(&pool).await?;
    let top = top_documents(&pool, 5).await?;

    let db_size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    println!("docgraph: Graph Stats");
    println!("=====================");
    println!();
    println!("  Store:       {}", db_path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  {:<14} {:>8}", "TABLE", "ROWS");
    println!("  {}", "-".repeat(23));
    for (kind, count) in &counts {
        println!("  {:<14} {:>8}", kind.graph_table(), count);
    }

    if !top.is_empty() {
        println!();
        println!("  Most connected documents:");
        for (key, title, degree) in &top {
            println!("  {:>4}  {}  {}", degree, key, title);
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
