//! Shared primitive aliases.

/// Surrogate key of a rule, log collection or log row (`BIGSERIAL`).
pub type DbId = i64;

/// Measurement and bookkeeping timestamps, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
