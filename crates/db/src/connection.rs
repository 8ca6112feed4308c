//! Database connection lifecycle.
//!
//! A single [`ConnectionManager`] is created at process start and shared via
//! `Arc` by the rule and log repositories. Repositories ask it for the pool
//! on every operation, so a [`restart`](ConnectionManager::restart) is picked
//! up without rebuilding them.

use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::RwLock;

use qosmon_core::error::QosError;

use crate::config::{DbConfig, SynchronousCommit, DEFAULT_WRITE_ACK_TIMEOUT_SECS};
use crate::error::classify;

/// Handles held while the manager is started.
#[derive(Debug)]
struct Connected {
    pool: PgPool,
    durability: SynchronousCommit,
    write_ack_timeout: Duration,
}

/// Owns the connection pool shared by the rule and log repositories.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    state: RwLock<Option<Connected>>,
}

impl ConnectionManager {
    /// Create a stopped manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a started manager around an existing pool, with the default
    /// write acknowledgement timeout.
    pub fn from_pool(pool: PgPool, durability: SynchronousCommit) -> Self {
        Self {
            state: RwLock::new(Some(Connected {
                pool,
                durability,
                write_ack_timeout: Duration::from_secs(DEFAULT_WRITE_ACK_TIMEOUT_SECS),
            })),
        }
    }

    /// Override the write acknowledgement timeout of a started manager.
    pub fn with_write_ack_timeout(mut self, timeout: Duration) -> Self {
        if let Some(connected) = self.state.get_mut() {
            connected.write_ack_timeout = timeout;
        }
        self
    }

    /// Connect using `config`. A started manager ignores the call.
    ///
    /// Connection failures are returned as `ConnectionFailure` and are not
    /// retried.
    pub async fn start(&self, config: &DbConfig) -> Result<(), QosError> {
        let mut state = self.state.write().await;
        if state.is_some() {
            tracing::debug!("Connection manager already started");
            return Ok(());
        }

        let options = config
            .connect_options()
            .map_err(|e| QosError::ConnectionFailure(e.to_string()))?;
        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| QosError::ConnectionFailure(e.to_string()))?;

        tracing::info!(
            max_connections = config.max_connections,
            synchronous_commit = %config.synchronous_commit,
            "Database connection pool created",
        );

        if let Err(e) = check_standbys(&pool, config.synchronous_commit).await {
            tracing::warn!(error = %e, "Writes will not be acknowledged by any replica");
        }

        *state = Some(Connected {
            pool,
            durability: config.synchronous_commit,
            write_ack_timeout: config.write_ack_timeout(),
        });
        Ok(())
    }

    /// Close the pool and drop every cached handle. A stopped manager
    /// ignores the call.
    pub async fn stop(&self) {
        let previous = self.state.write().await.take();
        if let Some(connected) = previous {
            connected.pool.close().await;
            tracing::info!("Database connection pool closed");
        }
    }

    /// Stop, then start with `config`.
    pub async fn restart(&self, config: &DbConfig) -> Result<(), QosError> {
        self.stop().await;
        self.start(config).await
    }

    pub async fn is_started(&self) -> bool {
        self.state.read().await.is_some()
    }

    /// The current pool handle.
    pub async fn pool(&self) -> Result<PgPool, QosError> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|c| c.pool.clone())
            .ok_or(QosError::NotStarted)
    }

    /// The `synchronous_commit` level applied to writes.
    pub async fn durability(&self) -> Result<SynchronousCommit, QosError> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|c| c.durability)
            .ok_or(QosError::NotStarted)
    }

    /// Begin a transaction whose commit waits for the configured
    /// replication acknowledgement.
    pub async fn begin_write(&self) -> Result<Transaction<'static, Postgres>, QosError> {
        let (pool, durability) = {
            let state = self.state.read().await;
            let connected = state.as_ref().ok_or(QosError::NotStarted)?;
            (connected.pool.clone(), connected.durability)
        };

        let mut tx = pool.begin().await.map_err(classify)?;
        // SET cannot take bind parameters; the value comes from a closed enum.
        let statement = format!("SET LOCAL synchronous_commit = '{}'", durability.as_str());
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        Ok(tx)
    }

    /// Commit a transaction opened by [`begin_write`](Self::begin_write).
    ///
    /// A commit that is not acknowledged within the write acknowledgement
    /// timeout fails with `WriteConflict`. The write may still have been
    /// applied on the primary.
    pub async fn commit_write(&self, tx: Transaction<'static, Postgres>) -> Result<(), QosError> {
        let (durability, ack_timeout) = {
            let state = self.state.read().await;
            let connected = state.as_ref().ok_or(QosError::NotStarted)?;
            (connected.durability, connected.write_ack_timeout)
        };

        match tokio::time::timeout(ack_timeout, tx.commit()).await {
            Ok(result) => result.map_err(classify),
            Err(_) => {
                tracing::error!(
                    synchronous_commit = %durability,
                    timeout_ms = ack_timeout.as_millis() as u64,
                    "Commit not acknowledged in time",
                );
                Err(QosError::WriteConflict(format!(
                    "commit not acknowledged at synchronous_commit={durability} within {}ms; \
                     the write may be applied on the primary",
                    ack_timeout.as_millis()
                )))
            }
        }
    }

    /// Run `SELECT 1` against the pool and confirm that the configured
    /// durability level can be met.
    ///
    /// A `remote_*` level on a server without `synchronous_standby_names`
    /// fails with `ConnectionFailure`.
    pub async fn health_check(&self) -> Result<(), QosError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(classify)?;
        check_standbys(&pool, self.durability().await?).await
    }

    /// Apply the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), QosError> {
        let pool = self.pool().await?;
        sqlx::migrate!("../../db/migrations")
            .run(&pool)
            .await
            .map_err(|e| QosError::Storage(e.to_string()))
    }
}

/// Fail when `durability` waits on standbys but none are configured, in
/// which case the server silently commits locally.
async fn check_standbys(pool: &PgPool, durability: SynchronousCommit) -> Result<(), QosError> {
    if !durability.waits_for_standbys() {
        return Ok(());
    }

    let standbys: String = sqlx::query_scalar("SHOW synchronous_standby_names")
        .fetch_one(pool)
        .await
        .map_err(classify)?;
    if standbys.trim().is_empty() {
        return Err(QosError::ConnectionFailure(format!(
            "synchronous_commit={durability} requires synchronous_standby_names to be set"
        )));
    }

    tracing::debug!(%standbys, "Synchronous standbys configured");
    Ok(())
}
