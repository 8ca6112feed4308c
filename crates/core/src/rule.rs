//! SLA rules and measurement logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::SystemIdentity;
use crate::types::Timestamp;

/// Typed, validated measurement values keyed by parameter name.
///
/// Produced by [`QosProfile::decode`](crate::profile::QosProfile::decode);
/// contains exactly the profile's required parameters.
pub type ParameterSet = BTreeMap<String, f64>;

/// Number of samples averaged in soft real-time mode when the rule message
/// does not specify a window.
pub const DEFAULT_SAMPLE_WINDOW: u32 = 10;

/// The SLA contract for one ordered `(provider, consumer)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub profile_type: String,
    pub provider: SystemIdentity,
    pub consumer: SystemIdentity,
    pub thresholds: ParameterSet,
    pub soft_real_time: bool,
    pub sample_window: u32,
}

impl Rule {
    /// Number of logs verification should read for this rule.
    ///
    /// Hard real-time rules look at the most recent sample only.
    pub fn samples_required(&self) -> u32 {
        if self.soft_real_time {
            self.sample_window
        } else {
            1
        }
    }
}

/// One measurement sample. Append-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub profile_type: String,
    pub timestamp: Timestamp,
    pub parameters: ParameterSet,
}
