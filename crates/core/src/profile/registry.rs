//! Lookup of verification strategies by profile identifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{Fttse, QosProfile};
use crate::error::QosError;
use crate::messages::{AddRuleMessage, LogMessage};
use crate::report::ViolationReport;
use crate::rule::{Log, ParameterSet, Rule};

/// Maps `profileType` identifiers to their strategies.
///
/// Built once at process start and shared read-only afterwards.
#[derive(Default, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<dyn QosProfile>>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in profile registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Fttse));
        registry
    }

    /// Register a strategy under its own name, returning any strategy it
    /// replaced.
    pub fn register(&mut self, profile: Arc<dyn QosProfile>) -> Option<Arc<dyn QosProfile>> {
        self.profiles.insert(profile.name().to_string(), profile)
    }

    pub fn contains(&self, profile_type: &str) -> bool {
        self.profiles.contains_key(profile_type)
    }

    /// Registered identifiers, sorted.
    pub fn profile_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a strategy. Identifiers are case-sensitive.
    pub fn get(&self, profile_type: &str) -> Result<&dyn QosProfile, QosError> {
        self.profiles
            .get(profile_type)
            .map(|p| p.as_ref())
            .ok_or_else(|| QosError::UnknownProfile(profile_type.to_string()))
    }

    pub fn decode(
        &self,
        profile_type: &str,
        raw: &HashMap<String, String>,
    ) -> Result<ParameterSet, QosError> {
        self.get(profile_type)?.decode(raw)
    }

    /// Verify with the strategy named by the rule's profile type.
    pub fn verify(&self, rule: &Rule, samples: &[ParameterSet]) -> Result<ViolationReport, QosError> {
        self.get(&rule.profile_type)?.verify(rule, samples)
    }

    /// Decode an inbound rule message into a [`Rule`].
    ///
    /// `default_window` is used when the message carries no sample window.
    pub fn build_rule(&self, msg: &AddRuleMessage, default_window: u32) -> Result<Rule, QosError> {
        let thresholds = self.decode(&msg.profile_type, &msg.parameters)?;
        let sample_window = msg.sample_window.unwrap_or(default_window);
        if sample_window == 0 {
            return Err(QosError::InvalidParameter {
                name: "sampleWindow".to_string(),
                value: sample_window.to_string(),
            });
        }

        Ok(Rule {
            profile_type: msg.profile_type.clone(),
            provider: msg.provider.clone(),
            consumer: msg.consumer.clone(),
            thresholds,
            soft_real_time: msg.soft_real_time,
            sample_window,
        })
    }

    /// Decode an inbound measurement message into a [`Log`].
    pub fn build_log(&self, msg: &LogMessage) -> Result<Log, QosError> {
        Ok(Log {
            profile_type: msg.profile_type.clone(),
            timestamp: msg.timestamp,
            parameters: self.decode(&msg.profile_type, &msg.parameters)?,
        })
    }
}

impl fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("profiles", &self.profile_types())
            .finish()
    }
}
