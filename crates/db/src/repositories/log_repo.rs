//! Repository for measurement logs (`qos_log_collections`, `qos_logs`).
//!
//! Every ordered provider/consumer pair owns one collection. Collections are
//! created on first insert and dropping one cascades to all its samples.

use std::sync::Arc;

use sqlx::types::Json;
use sqlx::PgConnection;

use qosmon_core::error::QosError;
use qosmon_core::identity::SystemIdentity;
use qosmon_core::rule::{Log, Rule};

use crate::connection::ConnectionManager;
use crate::error::classify;
use crate::models::log::{LogCollection, LogRow};

/// Column list for `qos_logs` queries, qualified with the `l` alias.
const COLUMNS: &str = "\
    l.id, l.collection_id, l.profile_type, l.\"timestamp\", l.parameters, l.created_at";

/// Column list for `qos_log_collections` queries.
const COLLECTION_COLUMNS: &str = "id, name, created_at";

/// Provides query operations for measurement logs.
#[derive(Debug, Clone)]
pub struct LogRepo {
    manager: Arc<ConnectionManager>,
}

impl LogRepo {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    /// Name of the collection holding the pair's samples.
    ///
    /// Plain concatenation of provider name, provider group, consumer name
    /// and consumer group. Pairs whose fields concatenate to the same string
    /// share a collection.
    pub fn collection_name(provider: &SystemIdentity, consumer: &SystemIdentity) -> String {
        [
            provider.name(),
            provider.group(),
            consumer.name(),
            consumer.group(),
        ]
        .concat()
    }

    /// Append a sample to the pair's collection, creating it if needed.
    pub async fn insert_log(
        &self,
        log: &Log,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<(), QosError> {
        let name = Self::collection_name(provider, consumer);
        let mut tx = self.manager.begin_write().await?;

        // DO UPDATE (rather than DO NOTHING) so RETURNING yields the id of
        // an existing collection too.
        let (collection_id,): (i64,) = sqlx::query_as(
            "INSERT INTO qos_log_collections (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id",
        )
        .bind(&name)
        .fetch_one(&mut *tx)
        .await
        .map_err(classify)?;

        sqlx::query(
            "INSERT INTO qos_logs (collection_id, profile_type, \"timestamp\", parameters) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(collection_id)
        .bind(&log.profile_type)
        .bind(log.timestamp)
        .bind(Json(&log.parameters))
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        self.manager.commit_write(tx).await?;
        tracing::debug!(collection = %name, timestamp = %log.timestamp, "Log inserted");
        Ok(())
    }

    /// The rule's `sample_window` most recent samples, newest first.
    ///
    /// Returns fewer when fewer are stored.
    pub async fn get_last_n_logs(&self, rule: &Rule) -> Result<Vec<Log>, QosError> {
        self.get_recent_logs(&rule.provider, &rule.consumer, rule.sample_window)
            .await
    }

    /// Up to `limit` most recent samples for the pair, newest first.
    pub async fn get_recent_logs(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
        limit: u32,
    ) -> Result<Vec<Log>, QosError> {
        let pool = self.manager.pool().await?;
        let query = format!(
            "SELECT {COLUMNS} FROM qos_logs l \
             JOIN qos_log_collections c ON c.id = l.collection_id \
             WHERE c.name = $1 \
             ORDER BY l.\"timestamp\" DESC, l.id DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, LogRow>(&query)
            .bind(Self::collection_name(provider, consumer))
            .bind(i64::from(limit))
            .fetch_all(&pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Log::from).collect())
    }

    /// Number of samples stored for the pair.
    pub async fn count_logs(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<i64, QosError> {
        let pool = self.manager.pool().await?;
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM qos_logs l \
             JOIN qos_log_collections c ON c.id = l.collection_id \
             WHERE c.name = $1",
        )
        .bind(Self::collection_name(provider, consumer))
        .fetch_one(&pool)
        .await
        .map_err(classify)?;
        Ok(count)
    }

    /// All collections, ordered by name.
    pub async fn list_collections(&self) -> Result<Vec<LogCollection>, QosError> {
        let pool = self.manager.pool().await?;
        let query = format!("SELECT {COLLECTION_COLUMNS} FROM qos_log_collections ORDER BY name");
        sqlx::query_as::<_, LogCollection>(&query)
            .fetch_all(&pool)
            .await
            .map_err(classify)
    }

    /// Drop the pair's collection and every sample in it.
    ///
    /// Returns `true` if a collection existed.
    pub async fn delete_collection(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        let mut tx = self.manager.begin_write().await?;
        let dropped = Self::drop_collection(&mut *tx, provider, consumer).await?;
        self.manager.commit_write(tx).await?;
        Ok(dropped)
    }

    /// Drop the pair's collection on an open connection or transaction.
    pub(crate) async fn drop_collection(
        conn: &mut PgConnection,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        let name = Self::collection_name(provider, consumer);
        let result = sqlx::query("DELETE FROM qos_log_collections WHERE name = $1")
            .bind(&name)
            .execute(conn)
            .await
            .map_err(classify)?;

        let dropped = result.rows_affected() > 0;
        if dropped {
            tracing::info!(collection = %name, "Log collection dropped");
        }
        Ok(dropped)
    }
}
