// SQLite snapshot history. Headline counters are columns; the full snapshot is JSON.

use crate::models::{Snapshot, SnapshotSummary};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

pub struct HistoryRepo {
    pool: SqlitePool,
    retention_secs: i64,
}

impl HistoryRepo {
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        retention_days: u32,
    ) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        let retention_secs = (retention_days as i64) * SECS_PER_DAY;
        Ok(Self {
            pool,
            retention_secs,
        })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshot_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                docker_version TEXT NOT NULL,
                swarm INTEGER NOT NULL,
                container_count INTEGER NOT NULL,
                running_container_count INTEGER NOT NULL,
                stopped_container_count INTEGER NOT NULL,
                healthy_container_count INTEGER NOT NULL,
                unhealthy_container_count INTEGER NOT NULL,
                image_count INTEGER NOT NULL,
                volume_count INTEGER NOT NULL,
                stack_count INTEGER NOT NULL,
                node_count INTEGER NOT NULL,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_snapshot_created_at ON snapshot_history(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stores a snapshot and returns its row id.
    #[instrument(skip(self, snapshot), fields(repo = "history", operation = "save_snapshot", time = snapshot.time))]
    pub async fn save_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<i64> {
        let data = serde_json::to_string(snapshot)?;
        let result = sqlx::query(
            r#"
            INSERT INTO snapshot_history
            (created_at, docker_version, swarm, container_count,
             running_container_count, stopped_container_count,
             healthy_container_count, unhealthy_container_count,
             image_count, volume_count, stack_count, node_count, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(snapshot.time)
        .bind(&snapshot.docker_version)
        .bind(snapshot.swarm)
        .bind(snapshot.container_count() as i64)
        .bind(snapshot.running_container_count as i64)
        .bind(snapshot.stopped_container_count as i64)
        .bind(snapshot.healthy_container_count as i64)
        .bind(snapshot.unhealthy_container_count as i64)
        .bind(snapshot.image_count as i64)
        .bind(snapshot.volume_count as i64)
        .bind(snapshot.stack_count as i64)
        .bind(snapshot.node_count as i64)
        .bind(&data)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn latest_snapshot(&self) -> anyhow::Result<Option<Snapshot>> {
        let row = sqlx::query("SELECT data FROM snapshot_history ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let data: String = row.try_get("data")?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Most recent summaries, newest first.
    pub async fn recent_summaries(&self, limit: u32) -> anyhow::Result<Vec<SnapshotSummary>> {
        let rows = sqlx::query(
            "SELECT id, created_at, docker_version, swarm, container_count,
                    running_container_count, stopped_container_count,
                    healthy_container_count, unhealthy_container_count,
                    image_count, volume_count, stack_count, node_count
             FROM snapshot_history ORDER BY id DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::parse_summary_row).collect()
    }

    #[instrument(skip(self), fields(repo = "history", operation = "prune_old_data"))]
    pub async fn prune_old_data(&self) -> anyhow::Result<u64> {
        let cutoff = chrono::Utc::now().timestamp() - self.retention_secs;
        let result = sqlx::query("DELETE FROM snapshot_history WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn parse_summary_row(row: &SqliteRow) -> anyhow::Result<SnapshotSummary> {
        let count = |column: &str| -> anyhow::Result<usize> {
            let v: i64 = row.try_get(column)?;
            Ok(usize::try_from(v)?)
        };
        Ok(SnapshotSummary {
            id: row.try_get("id")?,
            time: row.try_get("created_at")?,
            docker_version: row.try_get("docker_version")?,
            swarm: row.try_get("swarm")?,
            container_count: count("container_count")?,
            running_container_count: count("running_container_count")?,
            stopped_container_count: count("stopped_container_count")?,
            healthy_container_count: count("healthy_container_count")?,
            unhealthy_container_count: count("unhealthy_container_count")?,
            image_count: count("image_count")?,
            volume_count: count("volume_count")?,
            stack_count: count("stack_count")?,
            node_count: count("node_count")?,
        })
    }
}
