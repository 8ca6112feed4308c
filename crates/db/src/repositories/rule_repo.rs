//! Repository for the `qos_rules` table.

use std::sync::Arc;

use sqlx::types::Json;

use qosmon_core::error::QosError;
use qosmon_core::identity::SystemIdentity;
use qosmon_core::rule::Rule;

use crate::connection::ConnectionManager;
use crate::error::classify;
use crate::models::rule::RuleRow;
use crate::repositories::LogRepo;

/// Column list for `qos_rules` queries.
const COLUMNS: &str = "\
    id, profile_type, provider_name, provider_group, consumer_name, consumer_group, \
    thresholds, soft_real_time, sample_window, created_at";

/// Equality on all four identity columns.
const PAIR_FILTER: &str = "\
    provider_name = $1 AND provider_group = $2 AND consumer_name = $3 AND consumer_group = $4";

/// Provides query operations for SLA rules.
#[derive(Debug, Clone)]
pub struct RuleRepo {
    manager: Arc<ConnectionManager>,
}

impl RuleRepo {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    /// Insert a rule.
    ///
    /// Fails with `WriteConflict` if a rule already exists for the pair.
    pub async fn insert_rule(&self, rule: &Rule) -> Result<(), QosError> {
        let sample_window =
            i32::try_from(rule.sample_window).map_err(|_| QosError::InvalidParameter {
                name: "sampleWindow".to_string(),
                value: rule.sample_window.to_string(),
            })?;

        let mut tx = self.manager.begin_write().await?;
        sqlx::query(
            "INSERT INTO qos_rules \
                (profile_type, provider_name, provider_group, consumer_name, consumer_group, \
                 thresholds, soft_real_time, sample_window) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&rule.profile_type)
        .bind(rule.provider.name())
        .bind(rule.provider.group())
        .bind(rule.consumer.name())
        .bind(rule.consumer.group())
        .bind(Json(&rule.thresholds))
        .bind(rule.soft_real_time)
        .bind(sample_window)
        .execute(&mut *tx)
        .await
        .map_err(classify)?;
        self.manager.commit_write(tx).await?;

        tracing::debug!(
            provider = %rule.provider,
            consumer = %rule.consumer,
            profile_type = %rule.profile_type,
            "Rule inserted",
        );
        Ok(())
    }

    /// Find the rule for the exact ordered pair.
    pub async fn find_rule(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<Option<Rule>, QosError> {
        let pool = self.manager.pool().await?;
        let query = format!("SELECT {COLUMNS} FROM qos_rules WHERE {PAIR_FILTER}");
        let row = sqlx::query_as::<_, RuleRow>(&query)
            .bind(provider.name())
            .bind(provider.group())
            .bind(consumer.name())
            .bind(consumer.group())
            .fetch_optional(&pool)
            .await
            .map_err(classify)?;
        Ok(row.map(Rule::from))
    }

    pub async fn exists_rule(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        Ok(self.find_rule(provider, consumer).await?.is_some())
    }

    /// All rules, ordered by provider then consumer.
    pub async fn list_rules(&self) -> Result<Vec<Rule>, QosError> {
        let pool = self.manager.pool().await?;
        let query = format!(
            "SELECT {COLUMNS} FROM qos_rules \
             ORDER BY provider_group, provider_name, consumer_group, consumer_name"
        );
        let rows = sqlx::query_as::<_, RuleRow>(&query)
            .fetch_all(&pool)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(Rule::from).collect())
    }

    /// Replace the pair's rule, discarding its log history.
    ///
    /// Runs as a delete followed by a separate insert: a concurrent reader
    /// may see no rule for the pair in between.
    pub async fn replace_rule(&self, rule: &Rule) -> Result<(), QosError> {
        self.delete_rule(&rule.provider, &rule.consumer).await?;
        self.insert_rule(rule).await
    }

    /// Delete the pair's rule and its log collection in one transaction.
    ///
    /// Returns `true` if a rule existed. Deleting an absent rule still drops
    /// any orphaned log collection for the pair.
    pub async fn delete_rule(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        let mut tx = self.manager.begin_write().await?;
        let result = sqlx::query(&format!("DELETE FROM qos_rules WHERE {PAIR_FILTER}"))
            .bind(provider.name())
            .bind(provider.group())
            .bind(consumer.name())
            .bind(consumer.group())
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        LogRepo::drop_collection(&mut *tx, provider, consumer).await?;
        self.manager.commit_write(tx).await?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(%provider, %consumer, deleted, "Rule deleted");
        Ok(deleted)
    }
}
