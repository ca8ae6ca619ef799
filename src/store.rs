//! Typed access to the relational event store.
//!
//! The pipeline needs exactly three query shapes — candidate events by
//! container scope, the ordered category uids of one record, and the children
//! of one container — so the store seam is a trait with those three methods
//! rather than a general query builder. [`SqliteRecordStore`] is the shipped
//! implementation; tests substitute their own.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::models::{EventRecord, Restriction};

/// Name of the event table in the relational store. Category assignments are
/// scoped to this value in the join table.
pub const EVENT_TABLE: &str = "events";

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All events located in any of `container_ids`, narrowed by the
    /// time-window restriction. `now` is the pass's notion of current time.
    ///
    /// Fails with [`IndexError::Configuration`] when `container_ids` is
    /// empty, before any query runs: an empty scope means "nothing to
    /// index", never an unrestricted match.
    async fn select_events(
        &self,
        container_ids: &[i64],
        restriction: Restriction,
        now: i64,
    ) -> Result<Vec<EventRecord>>;

    /// Category uids assigned to `event_uid`, ordered by the assignment
    /// table's sort key. Empty when the event has no categories.
    async fn event_category_uids(&self, event_uid: i64) -> Result<Vec<i64>>;

    /// Direct children of `container_id` in the container tree.
    async fn child_containers(&self, container_id: i64) -> Result<Vec<i64>>;
}

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn select_events(
        &self,
        container_ids: &[i64],
        restriction: Restriction,
        now: i64,
    ) -> Result<Vec<EventRecord>> {
        if container_ids.is_empty() {
            return Err(IndexError::Configuration(
                "no storage containers configured".to_string(),
            ));
        }

        // Membership predicate from bound placeholders, one per container id.
        let placeholders = vec!["?"; container_ids.len()].join(", ");
        let mut sql = format!(
            "SELECT uid, pid, title, teaser, description, program, created_at, \
             start_date, end_date, visible_from, visible_until, access_groups, language \
             FROM {EVENT_TABLE} WHERE pid IN ({placeholders})"
        );
        match restriction {
            Restriction::FutureOnly => sql.push_str(" AND start_date >= ?"),
            Restriction::PastOnly => sql.push_str(" AND end_date < ?"),
            Restriction::None => {}
        }

        let mut query = sqlx::query_as::<_, EventRecord>(&sql);
        for id in container_ids {
            query = query.bind(*id);
        }
        if restriction != Restriction::None {
            query = query.bind(now);
        }

        let events = query.fetch_all(&self.pool).await?;
        debug!(
            candidates = events.len(),
            containers = container_ids.len(),
            ?restriction,
            "fetched candidate events"
        );
        Ok(events)
    }

    async fn event_category_uids(&self, event_uid: i64) -> Result<Vec<i64>> {
        let uids = sqlx::query_scalar::<_, i64>(
            "SELECT c.uid FROM categories c \
             JOIN category_assignments a ON a.category_uid = c.uid \
             WHERE a.record_uid = ? AND a.tablename = ? \
             ORDER BY a.sorting",
        )
        .bind(event_uid)
        .bind(EVENT_TABLE)
        .fetch_all(&self.pool)
        .await?;
        Ok(uids)
    }

    async fn child_containers(&self, container_id: i64) -> Result<Vec<i64>> {
        let uids = sqlx::query_scalar::<_, i64>(
            "SELECT uid FROM containers WHERE parent = ? ORDER BY uid",
        )
        .bind(container_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(uids)
    }
}
