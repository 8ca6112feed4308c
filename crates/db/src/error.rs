//! Mapping of sqlx failures onto the domain error taxonomy.

use qosmon_core::error::QosError;

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

/// Classify a sqlx error.
///
/// - Unique, serialization and deadlock failures map to `WriteConflict`.
/// - A closed pool maps to `NotStarted` (the manager was stopped underneath
///   the caller).
/// - Everything else maps to `Storage`.
pub fn classify(err: sqlx::Error) -> QosError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION | SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => {
                let constraint = db_err.constraint().unwrap_or("none");
                QosError::WriteConflict(format!("{} (constraint: {constraint})", db_err.message()))
            }
            _ => QosError::Storage(err.to_string()),
        },
        sqlx::Error::PoolClosed => QosError::NotStarted,
        _ => QosError::Storage(err.to_string()),
    }
}
