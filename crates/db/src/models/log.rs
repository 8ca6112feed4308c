//! Log collection and sample rows (`qos_log_collections`, `qos_logs`).

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

use qosmon_core::rule::{Log, ParameterSet};
use qosmon_core::types::{DbId, Timestamp};

/// The catalog entry for one provider/consumer pair's samples.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogCollection {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A row from the `qos_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogRow {
    pub id: DbId,
    pub collection_id: DbId,
    pub profile_type: String,
    pub timestamp: Timestamp,
    pub parameters: Json<ParameterSet>,
    pub created_at: Timestamp,
}

impl From<LogRow> for Log {
    fn from(row: LogRow) -> Self {
        Log {
            profile_type: row.profile_type,
            timestamp: row.timestamp,
            parameters: row.parameters.0,
        }
    }
}
