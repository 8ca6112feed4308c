//! Inbound message contracts delivered by the transport layer.
//!
//! Measurement values arrive as strings and are only typed once a
//! [`ProfileRegistry`](crate::profile::ProfileRegistry) decodes them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identity::SystemIdentity;
use crate::types::Timestamp;

/// Request to register (or replace) the SLA rule for a provider/consumer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRuleMessage {
    #[serde(alias = "type")]
    pub profile_type: String,
    pub provider: SystemIdentity,
    pub consumer: SystemIdentity,
    /// Raw threshold values keyed by parameter name.
    pub parameters: HashMap<String, String>,
    #[serde(default)]
    pub soft_real_time: bool,
    /// Samples averaged in soft real-time mode. Falls back to the
    /// configured default when absent.
    #[serde(default)]
    pub sample_window: Option<u32>,
}

/// One measurement sample for a provider/consumer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    #[serde(alias = "type")]
    pub profile_type: String,
    pub timestamp: Timestamp,
    /// Raw measured values keyed by parameter name.
    pub parameters: HashMap<String, String>,
}
