use anyhow::Result;
use sqlx::SqlitePool;

/// Creates the store-side tables read by the pipeline.
///
/// In production the event store is owned by the host system; this schema
/// exists so `evix init` can bootstrap a development store and so tests can
/// build fixtures. Idempotent.
pub async fn init_store_schema(pool: &SqlitePool) -> Result<()> {
    // Container tree for scope resolution
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS containers (
            uid INTEGER PRIMARY KEY,
            parent INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            uid INTEGER PRIMARY KEY,
            pid INTEGER NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            teaser TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            program TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL DEFAULT 0,
            start_date INTEGER NOT NULL DEFAULT 0,
            end_date INTEGER NOT NULL DEFAULT 0,
            visible_from INTEGER NOT NULL DEFAULT 0,
            visible_until INTEGER NOT NULL DEFAULT 0,
            access_groups TEXT NOT NULL DEFAULT '',
            language INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            uid INTEGER PRIMARY KEY,
            title TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Many-to-many category join; tablename scopes assignments to one record
    // table, sorting is the assignment order key.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS category_assignments (
            category_uid INTEGER NOT NULL,
            record_uid INTEGER NOT NULL,
            tablename TEXT NOT NULL,
            sorting INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (category_uid, record_uid, tablename)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_pid ON events(pid)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_containers_parent ON containers(parent)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assignments_record ON category_assignments(tablename, record_uid, sorting)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Creates the index-side tables owned by this tool. Idempotent.
pub async fn init_index_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS index_entries (
            id TEXT PRIMARY KEY,
            partition INTEGER NOT NULL,
            entry_type TEXT NOT NULL,
            target_container INTEGER NOT NULL,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            teaser TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '',
            link_params TEXT NOT NULL DEFAULT '',
            language INTEGER NOT NULL DEFAULT 0,
            start_time INTEGER NOT NULL DEFAULT 0,
            end_time INTEGER NOT NULL DEFAULT 0,
            access_groups TEXT NOT NULL DEFAULT '',
            sortdate INTEGER NOT NULL DEFAULT 0,
            orig_uid INTEGER NOT NULL,
            orig_pid INTEGER NOT NULL,
            checksum TEXT NOT NULL,
            additional_json TEXT NOT NULL DEFAULT '{}',
            indexed_at INTEGER NOT NULL,
            UNIQUE(partition, entry_type, orig_uid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // FTS5 CREATE is not idempotent natively, so we check first
    let fts_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='index_fts'",
    )
    .fetch_one(pool)
    .await?;

    if !fts_exists {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE index_fts USING fts5(
                entry_id UNINDEXED,
                title,
                body,
                teaser
            )
            "#,
        )
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_entries_partition ON index_entries(partition, entry_type)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_sortdate ON index_entries(sortdate DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
