//! Keyword search over committed index entries.
//!
//! A verification surface for operators: after a pass, `evix search` shows
//! what actually landed in the index. Ranking is SQLite's bm25; this module
//! does not define its own scoring.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

pub async fn run_search(pool: &SqlitePool, query: &str, limit: i64) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let rows = sqlx::query(
        r#"
        SELECT e.title, e.entry_type, e.orig_uid, e.tags,
               bm25(index_fts) AS score,
               snippet(index_fts, 2, '[', ']', '…', 12) AS snip
        FROM index_fts
        JOIN index_entries e ON e.id = index_fts.entry_id
        WHERE index_fts MATCH ?
        ORDER BY score
        LIMIT ?
        "#,
    )
    .bind(query)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for row in &rows {
        let title: String = row.get("title");
        let entry_type: String = row.get("entry_type");
        let orig_uid: i64 = row.get("orig_uid");
        let score: f64 = row.get("score");
        let snip: String = row.get("snip");

        println!("{score:>8.3}  {entry_type:<12} #{orig_uid:<6} {title}");
        println!("          {snip}");
    }
    println!();
    println!("{} result(s)", rows.len());

    Ok(())
}
