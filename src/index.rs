//! The search-index write seam.
//!
//! [`SearchIndex`] is the single write call into the consuming search layer;
//! its parameter set mirrors that layer's document interface and must stay
//! stable. [`SqliteSearchIndex`] is the shipped implementation: one row in
//! `index_entries` plus an FTS5 shadow row per document, keyed by
//! `(partition, entry_type, orig_uid)` so re-indexing an unchanged store
//! rewrites rows instead of duplicating them.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{IndexError, Result};
use crate::models::AdditionalFields;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Commits one document to the index and bumps the running counter.
    #[allow(clippy::too_many_arguments)]
    async fn store_document(
        &self,
        partition: i64,
        title: &str,
        content_type: &str,
        target_container: i64,
        body: &str,
        tags: &str,
        link_params: &str,
        teaser: &str,
        language: i64,
        start_time: i64,
        end_time: i64,
        access_groups: &str,
        debug_only: bool,
        additional: &AdditionalFields,
    ) -> Result<()>;

    /// Running count of documents committed through this index handle.
    fn written_count(&self) -> u64;
}

pub struct SqliteSearchIndex {
    pool: SqlitePool,
    written: AtomicU64,
}

impl SqliteSearchIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            written: AtomicU64::new(0),
        }
    }
}

fn write_err(e: sqlx::Error) -> IndexError {
    IndexError::IndexWrite(e.into())
}

fn field_i64(fields: &AdditionalFields, key: &str) -> i64 {
    fields.get(key).and_then(|v| v.as_i64()).unwrap_or_default()
}

/// SHA-256 over the canonical content of an entry. Stable across runs for an
/// unchanged store, so two passes over the same data produce byte-identical
/// checksums.
#[allow(clippy::too_many_arguments)]
fn entry_checksum(
    partition: i64,
    title: &str,
    content_type: &str,
    body: &str,
    tags: &str,
    link_params: &str,
    teaser: &str,
    additional_json: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(partition.to_le_bytes());
    for part in [title, content_type, body, tags, link_params, teaser, additional_json] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl SearchIndex for SqliteSearchIndex {
    async fn store_document(
        &self,
        partition: i64,
        title: &str,
        content_type: &str,
        target_container: i64,
        body: &str,
        tags: &str,
        link_params: &str,
        teaser: &str,
        language: i64,
        start_time: i64,
        end_time: i64,
        access_groups: &str,
        _debug_only: bool,
        additional: &AdditionalFields,
    ) -> Result<()> {
        // sortdate/orig_uid/orig_pid get dedicated columns; the rest of the
        // map round-trips through additional_json.
        let sortdate = field_i64(additional, "sortdate");
        let orig_uid = field_i64(additional, "orig_uid");
        let orig_pid = field_i64(additional, "orig_pid");
        let extra: AdditionalFields = additional
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "sortdate" | "orig_uid" | "orig_pid"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let additional_json =
            serde_json::to_string(&extra).map_err(|e| IndexError::IndexWrite(e.into()))?;

        let checksum = entry_checksum(
            partition,
            title,
            content_type,
            body,
            tags,
            link_params,
            teaser,
            &additional_json,
        );
        let now = Utc::now().timestamp();

        let mut tx = self.pool.begin().await.map_err(write_err)?;

        let existing_id: Option<String> = sqlx::query_scalar(
            "SELECT id FROM index_entries WHERE partition = ? AND entry_type = ? AND orig_uid = ?",
        )
        .bind(partition)
        .bind(content_type)
        .bind(orig_uid)
        .fetch_optional(&mut *tx)
        .await
        .map_err(write_err)?;

        let id = match existing_id {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE index_entries SET
                        target_container = ?, title = ?, body = ?, teaser = ?, tags = ?,
                        link_params = ?, language = ?, start_time = ?, end_time = ?,
                        access_groups = ?, sortdate = ?, orig_pid = ?, checksum = ?,
                        additional_json = ?, indexed_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(target_container)
                .bind(title)
                .bind(body)
                .bind(teaser)
                .bind(tags)
                .bind(link_params)
                .bind(language)
                .bind(start_time)
                .bind(end_time)
                .bind(access_groups)
                .bind(sortdate)
                .bind(orig_pid)
                .bind(&checksum)
                .bind(&additional_json)
                .bind(now)
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                sqlx::query(
                    r#"
                    INSERT INTO index_entries (
                        id, partition, entry_type, target_container, title, body, teaser,
                        tags, link_params, language, start_time, end_time, access_groups,
                        sortdate, orig_uid, orig_pid, checksum, additional_json, indexed_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&id)
                .bind(partition)
                .bind(content_type)
                .bind(target_container)
                .bind(title)
                .bind(body)
                .bind(teaser)
                .bind(tags)
                .bind(link_params)
                .bind(language)
                .bind(start_time)
                .bind(end_time)
                .bind(access_groups)
                .bind(sortdate)
                .bind(orig_uid)
                .bind(orig_pid)
                .bind(&checksum)
                .bind(&additional_json)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
                id
            }
        };

        // Keep the FTS shadow row in lockstep
        sqlx::query("DELETE FROM index_fts WHERE entry_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        sqlx::query("INSERT INTO index_fts (entry_id, title, body, teaser) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(title)
            .bind(body)
            .bind(teaser)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        tx.commit().await.map_err(write_err)?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}
