//! Rule rows (`qos_rules`).

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use qosmon_core::identity::SystemIdentity;
use qosmon_core::rule::{ParameterSet, Rule};
use qosmon_core::types::{DbId, Timestamp};

/// A row from the `qos_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RuleRow {
    pub id: DbId,
    pub profile_type: String,
    pub provider_name: String,
    pub provider_group: String,
    pub consumer_name: String,
    pub consumer_group: String,
    pub thresholds: Json<ParameterSet>,
    pub soft_real_time: bool,
    pub sample_window: i32,
    pub created_at: Timestamp,
}

impl From<RuleRow> for Rule {
    fn from(row: RuleRow) -> Self {
        Rule {
            profile_type: row.profile_type,
            provider: SystemIdentity::new(row.provider_name, row.provider_group),
            consumer: SystemIdentity::new(row.consumer_name, row.consumer_group),
            thresholds: row.thresholds.0,
            soft_real_time: row.soft_real_time,
            // The table enforces sample_window > 0.
            sample_window: row.sample_window.max(1) as u32,
        }
    }
}
