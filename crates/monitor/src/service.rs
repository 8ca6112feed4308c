//! The monitor facade: rule registration, log ingestion and verification.
//!
//! [`QosMonitor`] ties the profile registry to the rule and log stores and
//! publishes a [`QosEvent::SlaViolation`] whenever a verification finds a
//! parameter out of contract.

use std::sync::Arc;

use qosmon_core::error::QosError;
use qosmon_core::identity::SystemIdentity;
use qosmon_core::messages::{AddRuleMessage, LogMessage};
use qosmon_core::profile::registry::ProfileRegistry;
use qosmon_core::report::ViolationReport;
use qosmon_core::rule::{ParameterSet, Rule, DEFAULT_SAMPLE_WINDOW};
use qosmon_db::models::log::LogCollection;
use qosmon_db::{ConnectionManager, LogRepo, RuleRepo};
use qosmon_events::{EventBus, QosEvent};

/// Entry point for inbound rule and log messages.
#[derive(Clone)]
pub struct QosMonitor {
    registry: Arc<ProfileRegistry>,
    rules: RuleRepo,
    logs: LogRepo,
    events: Arc<EventBus>,
    default_sample_window: u32,
}

impl QosMonitor {
    pub fn new(
        manager: Arc<ConnectionManager>,
        registry: Arc<ProfileRegistry>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            registry,
            rules: RuleRepo::new(Arc::clone(&manager)),
            logs: LogRepo::new(manager),
            events,
            default_sample_window: DEFAULT_SAMPLE_WINDOW,
        }
    }

    /// Window applied to soft real-time rules registered without one.
    pub fn with_default_sample_window(mut self, window: u32) -> Self {
        self.default_sample_window = window;
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleRepo {
        &self.rules
    }

    pub fn logs(&self) -> &LogRepo {
        &self.logs
    }

    // -----------------------------------------------------------------------
    // Rules
    // -----------------------------------------------------------------------

    /// Decode and register a rule, replacing any rule for the same pair.
    ///
    /// Replacing discards the pair's log history. Nothing is written when
    /// decoding fails.
    pub async fn add_rule(&self, msg: &AddRuleMessage) -> Result<Rule, QosError> {
        let rule = self.registry.build_rule(msg, self.default_sample_window)?;
        self.rules.replace_rule(&rule).await?;

        tracing::info!(
            provider = %rule.provider,
            consumer = %rule.consumer,
            profile_type = %rule.profile_type,
            soft_real_time = rule.soft_real_time,
            "Rule registered",
        );
        Ok(rule)
    }

    /// Remove the pair's rule together with its log history.
    pub async fn remove_rule(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        self.rules.delete_rule(provider, consumer).await
    }

    pub async fn find_rule(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<Option<Rule>, QosError> {
        self.rules.find_rule(provider, consumer).await
    }

    pub async fn list_rules(&self) -> Result<Vec<Rule>, QosError> {
        self.rules.list_rules().await
    }

    // -----------------------------------------------------------------------
    // Logs
    // -----------------------------------------------------------------------

    /// Store a measurement for the pair and verify the pair's rule, if any.
    ///
    /// Returns the verification report when a rule exists. A log whose
    /// profile differs from the rule's is rejected with `ProfileMismatch`
    /// before anything is stored.
    pub async fn record_log(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
        msg: &LogMessage,
    ) -> Result<Option<ViolationReport>, QosError> {
        let log = self.registry.build_log(msg)?;
        let rule = self.rules.find_rule(provider, consumer).await?;

        if let Some(rule) = &rule {
            if rule.profile_type != log.profile_type {
                return Err(QosError::ProfileMismatch {
                    rule: rule.profile_type.clone(),
                    log: log.profile_type,
                });
            }
        }

        self.logs.insert_log(&log, provider, consumer).await?;

        match rule {
            Some(rule) => self.verify_rule(&rule).await.map(Some),
            None => {
                tracing::debug!(%provider, %consumer, "Log stored for pair without a rule");
                Ok(None)
            }
        }
    }

    pub async fn list_collections(&self) -> Result<Vec<LogCollection>, QosError> {
        self.logs.list_collections().await
    }

    pub async fn count_logs(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<i64, QosError> {
        self.logs.count_logs(provider, consumer).await
    }

    /// Drop the pair's log history, keeping its rule.
    pub async fn purge_collection(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<bool, QosError> {
        self.logs.delete_collection(provider, consumer).await
    }

    // -----------------------------------------------------------------------
    // Verification
    // -----------------------------------------------------------------------

    /// Verify the pair's rule against its stored samples.
    pub async fn verify_pair(
        &self,
        provider: &SystemIdentity,
        consumer: &SystemIdentity,
    ) -> Result<ViolationReport, QosError> {
        let rule = self
            .rules
            .find_rule(provider, consumer)
            .await?
            .ok_or_else(|| QosError::RuleNotFound {
                provider: provider.clone(),
                consumer: consumer.clone(),
            })?;
        self.verify_rule(&rule).await
    }

    /// Hard real-time rules check the newest sample only; soft real-time
    /// rules average over their window.
    async fn verify_rule(&self, rule: &Rule) -> Result<ViolationReport, QosError> {
        let logs = if rule.soft_real_time {
            self.logs.get_last_n_logs(rule).await?
        } else {
            self.logs
                .get_recent_logs(&rule.provider, &rule.consumer, 1)
                .await?
        };

        if let Some(log) = logs.iter().find(|l| l.profile_type != rule.profile_type) {
            return Err(QosError::ProfileMismatch {
                rule: rule.profile_type.clone(),
                log: log.profile_type.clone(),
            });
        }

        let samples: Vec<ParameterSet> = logs.into_iter().map(|l| l.parameters).collect();
        let report = self.registry.verify(rule, &samples)?;

        if !report.is_compliant() {
            tracing::warn!(
                provider = %rule.provider,
                consumer = %rule.consumer,
                profile_type = %rule.profile_type,
                violations = report.violations.len(),
                "SLA violation detected",
            );
            self.events.publish(QosEvent::sla_violation(
                rule.provider.clone(),
                rule.consumer.clone(),
                rule.profile_type.clone(),
                report.clone(),
            ));
        }
        Ok(report)
    }
}
