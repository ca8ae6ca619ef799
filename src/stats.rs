//! Index statistics and health overview.
//!
//! A quick summary of what's in the index: entry totals, a per-kind and
//! per-partition breakdown with last-indexed timestamps, and database file
//! sizes. Used by `evix stats` to confirm that passes are landing where
//! their configuration says they should.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::Config;

struct PartitionStats {
    entry_type: String,
    partition: i64,
    entry_count: i64,
    last_indexed: Option<i64>,
}

/// Run the stats command: query the index and print a summary.
pub async fn run_stats(config: &Config, pool: &SqlitePool) -> Result<()> {
    let total_entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM index_entries")
        .fetch_one(pool)
        .await?;

    let store_size = std::fs::metadata(&config.store.path)
        .map(|m| m.len())
        .unwrap_or(0);
    let index_size = std::fs::metadata(&config.index.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Event Indexer — Index Stats");
    println!("===========================");
    println!();
    println!("  Store:    {} ({})", config.store.path.display(), format_bytes(store_size));
    println!("  Index:    {} ({})", config.index.path.display(), format_bytes(index_size));
    println!();
    println!("  Entries:  {}", total_entries);

    let rows = sqlx::query(
        r#"
        SELECT entry_type, partition, COUNT(*) AS entry_count, MAX(indexed_at) AS last_indexed
        FROM index_entries
        GROUP BY entry_type, partition
        ORDER BY entry_type, partition
        "#,
    )
    .fetch_all(pool)
    .await?;

    let partitions: Vec<PartitionStats> = rows
        .iter()
        .map(|row| PartitionStats {
            entry_type: row.get("entry_type"),
            partition: row.get("partition"),
            entry_count: row.get("entry_count"),
            last_indexed: row.get("last_indexed"),
        })
        .collect();

    if !partitions.is_empty() {
        println!();
        println!("  By partition:");
        println!(
            "  {:<14} {:>9} {:>8}   {}",
            "TYPE", "PARTITION", "ENTRIES", "LAST INDEXED"
        );
        println!("  {}", "-".repeat(56));

        for p in &partitions {
            let indexed_display = match p.last_indexed {
                Some(ts) => format_ts_relative(ts),
                None => "never".to_string(),
            };
            println!(
                "  {:<14} {:>9} {:>8}   {}",
                p.entry_type, p.partition, p.entry_count, indexed_display
            );
        }
    }

    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
